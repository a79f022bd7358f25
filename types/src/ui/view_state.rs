//! View state for rendering.
//!
//! Groups the purely visual state of the game screen, separate from the
//! authoritative game state.

use std::time::Instant;

use super::{LetterFlash, OverlayEffect, ScorePulse};

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

#[derive(Debug)]
pub struct ViewState {
    pub overlay_effect: Option<OverlayEffect>,
    pub score_pulse: Option<ScorePulse>,
    pub letter_flash: Option<LetterFlash>,
    pub ui_options: UiOptions,
    /// Timestamp of last frame (for animation timing).
    pub last_frame: Instant,
}

impl ViewState {
    #[must_use]
    pub fn new(ui_options: UiOptions, now: Instant) -> Self {
        Self {
            overlay_effect: None,
            score_pulse: None,
            letter_flash: None,
            ui_options,
            last_frame: now,
        }
    }

    /// Advance every running effect to `now` and drop the finished ones.
    ///
    /// Overlay effects are kept after completion; the renderer treats a
    /// completed effect as the resting layout.
    pub fn advance(&mut self, now: Instant) {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        if let Some(effect) = self.overlay_effect.as_mut() {
            effect.advance(delta);
        }
        if let Some(pulse) = self.score_pulse.as_mut() {
            pulse.advance(delta);
            if pulse.is_finished() {
                self.score_pulse = None;
            }
        }
        if let Some(flash) = self.letter_flash.as_mut() {
            flash.advance(delta);
            if flash.is_finished() {
                self.letter_flash = None;
            }
        }
    }

    pub fn clear_effects(&mut self) {
        self.overlay_effect = None;
        self.score_pulse = None;
        self.letter_flash = None;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(UiOptions::default(), Instant::now())
    }
}
