//! Transient notification slot types.

use std::fmt;
use std::time::{Duration, Instant};

/// How long TurnChange and Error overlays stay up.
pub const OVERLAY_DWELL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    TurnChange,
    Error,
    Victory,
    Confirm,
}

impl OverlayKind {
    /// `None` means the slot persists until dismissed.
    #[must_use]
    pub const fn dwell(self) -> Option<Duration> {
        match self {
            Self::TurnChange | Self::Error => Some(OVERLAY_DWELL),
            Self::Victory | Self::Confirm => None,
        }
    }
}

/// Message identifiers. `as_key` is the stable lookup key; `english` is the
/// built-in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ChangeTurn,
    TurnSpin,
    SwapPlayers,
    WrongAnswerTurn,
    WrongAnswerSingle,
    MustSpinFirst,
    SelectVowel,
    LowMoney,
    NetworkError,
    ServerError,
    NewGameConfirm,
    Victory,
}

impl MessageKey {
    #[must_use]
    pub const fn as_key(self) -> &'static str {
        match self {
            Self::ChangeTurn => "overlay.changeTurn",
            Self::TurnSpin => "overlay.turnSpin",
            Self::SwapPlayers => "overlay.swapPlayers",
            Self::WrongAnswerTurn => "overlay.wrongAnswerTurn",
            Self::WrongAnswerSingle => "overlay.wrongAnswerSingle",
            Self::MustSpinFirst => "wheel.mustSpinFirst",
            Self::SelectVowel => "lettersGrid.selectVowel",
            Self::LowMoney => "buyVowel.lowMoney",
            Self::NetworkError => "error.network",
            Self::ServerError => "error.server",
            Self::NewGameConfirm => "overlay.newGameConfirm",
            Self::Victory => "overlay.victory",
        }
    }

    #[must_use]
    pub const fn english(self) -> &'static str {
        match self {
            Self::ChangeTurn => "Next turn",
            Self::TurnSpin => "Spin the wheel",
            Self::SwapPlayers => "Players swapped! Now playing",
            Self::WrongAnswerTurn => "Wrong answer! Turn passes to",
            Self::WrongAnswerSingle => "Wrong answer! Try again",
            Self::MustSpinFirst => "Spin the wheel first",
            Self::SelectVowel => "Select a vowel",
            Self::LowMoney => "Not enough points to buy a vowel",
            Self::NetworkError => "Could not reach the game server",
            Self::ServerError => "Server error",
            Self::NewGameConfirm => "Change players for the new game?",
            Self::Victory => "Phrase solved!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayMessage {
    Key(MessageKey),
    /// Text from the server, already sanitized for display.
    Text(String),
}

impl OverlayMessage {
    #[must_use]
    pub fn key(&self) -> Option<MessageKey> {
        match self {
            Self::Key(key) => Some(*key),
            Self::Text(_) => None,
        }
    }
}

impl From<MessageKey> for OverlayMessage {
    fn from(key: MessageKey) -> Self {
        Self::Key(key)
    }
}

impl fmt::Display for OverlayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key.english()),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One notification. The coordinator owns at most one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySlot {
    pub kind: OverlayKind,
    pub message: OverlayMessage,
    pub target_player: Option<String>,
    pub is_error: bool,
    /// Set by the coordinator when the slot is shown.
    pub expires_at: Option<Instant>,
}

impl OverlaySlot {
    #[must_use]
    pub fn new(kind: OverlayKind, message: impl Into<OverlayMessage>) -> Self {
        Self {
            kind,
            message: message.into(),
            target_player: None,
            is_error: matches!(kind, OverlayKind::Error),
            expires_at: None,
        }
    }

    #[must_use]
    pub fn turn_change(message: MessageKey, target_player: Option<String>) -> Self {
        Self {
            target_player,
            ..Self::new(OverlayKind::TurnChange, message)
        }
    }

    #[must_use]
    pub fn error(message: impl Into<OverlayMessage>) -> Self {
        Self::new(OverlayKind::Error, message)
    }

    #[must_use]
    pub fn victory() -> Self {
        Self::new(OverlayKind::Victory, MessageKey::Victory)
    }

    #[must_use]
    pub fn confirm_new_game() -> Self {
        Self::new(OverlayKind::Confirm, MessageKey::NewGameConfirm)
    }

    #[must_use]
    pub fn with_error_style(mut self) -> Self {
        self.is_error = true;
        self
    }

    /// The plain "next player" notification, the only slot whose target may
    /// follow the active player index.
    #[must_use]
    pub fn is_generic_turn_change(&self) -> bool {
        self.kind == OverlayKind::TurnChange
            && self.message == OverlayMessage::Key(MessageKey::ChangeTurn)
    }
}
