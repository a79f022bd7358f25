//! Turning failed server calls into overlay text.

use fortuna_client::ClientError;
use fortuna_types::{MessageKey, OverlayMessage, sanitize_terminal_text};

/// Message used when a rejection carries no text of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFallback {
    /// Vowel purchase: the usual cause is not enough points.
    LowMoney,
    Server,
}

#[must_use]
pub fn error_message(err: &ClientError, fallback: ErrorFallback) -> OverlayMessage {
    match err {
        ClientError::Rejected {
            message: Some(message),
            ..
        } => {
            let text = sanitize_terminal_text(message);
            if text.trim().is_empty() {
                fallback_message(err, fallback)
            } else {
                OverlayMessage::Text(text.into_owned())
            }
        }
        _ => fallback_message(err, fallback),
    }
}

fn fallback_message(err: &ClientError, fallback: ErrorFallback) -> OverlayMessage {
    match (fallback, err) {
        (ErrorFallback::LowMoney, _) => MessageKey::LowMoney.into(),
        (ErrorFallback::Server, ClientError::Rejected { status, .. }) => {
            OverlayMessage::Text(format!("{} ({status})", MessageKey::ServerError.english()))
        }
        (ErrorFallback::Server, ClientError::Network(_)) => MessageKey::NetworkError.into(),
        (ErrorFallback::Server, _) => MessageKey::ServerError.into(),
    }
}
