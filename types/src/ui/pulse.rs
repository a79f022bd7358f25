//! Short-lived score and letter indicators.

use std::time::Duration;

use super::animation::EffectTimer;

pub const SCORE_PULSE_DURATION: Duration = Duration::from_millis(1200);
pub const LETTER_FLASH_DURATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseDirection {
    Gain,
    Loss,
}

/// A floating "+300" / "-500" next to a player's score.
#[derive(Debug, Clone)]
pub struct ScorePulse {
    player: String,
    amount: i64,
    direction: PulseDirection,
    timer: EffectTimer,
}

impl ScorePulse {
    #[must_use]
    pub fn gain(player: impl Into<String>, amount: i64) -> Self {
        Self::new(player.into(), amount, PulseDirection::Gain)
    }

    #[must_use]
    pub fn loss(player: impl Into<String>, amount: i64) -> Self {
        Self::new(player.into(), amount, PulseDirection::Loss)
    }

    fn new(player: String, amount: i64, direction: PulseDirection) -> Self {
        Self {
            player,
            amount: amount.abs(),
            direction,
            timer: EffectTimer::new(SCORE_PULSE_DURATION),
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    #[must_use]
    pub fn player(&self) -> &str {
        &self.player
    }

    #[must_use]
    pub fn amount(&self) -> i64 {
        self.amount
    }

    #[must_use]
    pub fn direction(&self) -> PulseDirection {
        self.direction
    }

    /// Signed label, e.g. `+300` or `-500`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.direction {
            PulseDirection::Gain => format!("+{}", self.amount),
            PulseDirection::Loss => format!("-{}", self.amount),
        }
    }
}

/// A letter briefly marked wrong in the letters grid.
#[derive(Debug, Clone)]
pub struct LetterFlash {
    letter: char,
    timer: EffectTimer,
}

impl LetterFlash {
    #[must_use]
    pub fn wrong(letter: char) -> Self {
        Self {
            letter: letter.to_ascii_uppercase(),
            timer: EffectTimer::new(LETTER_FLASH_DURATION),
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    #[must_use]
    pub fn letter(&self) -> char {
        self.letter
    }
}
