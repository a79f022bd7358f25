//! Failure modes of a game-server call.

use thiserror::Error;

/// Longest server error message kept for display.
const MAX_MESSAGE_CHARS: usize = 300;

/// JSON fields a server error body may carry its message in, by priority.
const MESSAGE_FIELDS: [&str; 3] = ["detail", "error", "message"];

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("could not reach the game server: {0}")]
    Network(#[source] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("game server rejected the request (status {status})")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    /// The server answered 2xx with a body that does not parse.
    #[error("game server sent an unreadable response: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("invalid game server URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("game server URL {url:?} must be an http(s) base URL")]
    UnsupportedUrl { url: String },
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// Message the server attached to a rejection, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Pull a human-readable message out of an error body.
///
/// Takes the first non-empty string among `detail`, `error` and `message`.
/// FastAPI-style validation errors (`detail: [{"msg": ...}]`) yield the
/// first `msg`.
pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;
    MESSAGE_FIELDS.iter().find_map(|field| {
        let candidate = match object.get(*field)? {
            serde_json::Value::String(text) => text.trim().to_string(),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.get("msg")?.as_str())
                .map(|text| text.trim().to_string())?,
            _ => return None,
        };
        (!candidate.is_empty()).then(|| truncate(candidate))
    })
}

fn truncate(mut text: String) -> String {
    if let Some((cut, _)) = text.char_indices().nth(MAX_MESSAGE_CHARS) {
        text.truncate(cut);
        text.push('…');
    }
    text
}
