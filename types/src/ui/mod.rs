//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no async, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

mod animation;
mod overlay_effect;
mod pulse;
mod view_state;

pub use animation::AnimPhase;
pub use overlay_effect::{OverlayEffect, OverlayEffectKind};
pub use pulse::{
    LETTER_FLASH_DURATION, LetterFlash, PulseDirection, SCORE_PULSE_DURATION, ScorePulse,
};
pub use view_state::{UiOptions, ViewState};
