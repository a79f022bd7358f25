//! Core domain types for Fortuna.
//!
//! This crate contains pure domain types with no IO and no async: wheel
//! outcomes and sectors, the local mirror of server state, the wire shapes
//! of server responses, overlay slots and visual effect timers. Everything
//! here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod mirror;
mod outcome;
mod overlay;
mod roster;
mod sanitize;
mod sector;
mod snapshot;
pub mod ui;

pub use mirror::GameStateMirror;
pub use outcome::{BANKRUPT_WIRE, OutcomeParseError, OutcomeTag, PASS_WIRE, SpinValue};
pub use overlay::{MessageKey, OVERLAY_DWELL, OverlayKind, OverlayMessage, OverlaySlot};
pub use roster::{MAX_NAME_LEN, MAX_PLAYERS, PlayerRoster, RosterError, SOLO_DEFAULT_NAME};
pub use sanitize::sanitize_terminal_text;
pub use sector::{Rgb, Sector, SectorMatch, SectorTable, SectorTableError, normalize_angle};
pub use snapshot::{
    GuessResponse, NewGameResponse, PhraseGuessResponse, PlayerRef, Snapshot, SpinResponse,
    UsedLetters,
};

/// Vowels can only be revealed by buying them.
pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Whether `letter` is one of [`VOWELS`], case-insensitively.
#[must_use]
pub fn is_vowel(letter: char) -> bool {
    VOWELS.contains(&letter.to_ascii_uppercase())
}

/// Points a vowel costs.
pub const VOWEL_PRICE: i64 = 500;
