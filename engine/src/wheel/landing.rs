//! Planning a committed landing on a chosen sector.

use std::f64::consts::TAU;
use std::ops::{Range, RangeInclusive};
use std::time::Duration;

use rand::Rng;

use fortuna_types::{SectorTable, normalize_angle};

use super::easing::Easing;

/// Random nudge added to the angle before a landing starts.
pub const START_NUDGE: Range<f64> = 0.0..0.5;
/// Whole turns of flourish.
pub const EXTRA_TURNS: RangeInclusive<u32> = 8..=15;
/// Additional whole turns of jitter on top of the flourish.
pub const JITTER_TURNS: RangeInclusive<u32> = 0..=3;
pub const MIN_DURATION_MS: u64 = 2000;
pub const DURATION_SPREAD_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingPlan {
    pub target_index: usize,
    pub start_angle: f64,
    pub target_angle: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl LandingPlan {
    /// Plan a landing from `current_angle` onto the center of sector
    /// `target_index`.
    ///
    /// The path is the forward distance to the wedge center plus a whole
    /// number of turns, so the resting sector does not depend on the
    /// randomized flourish.
    pub fn compute<R: Rng + ?Sized>(
        table: &SectorTable,
        current_angle: f64,
        target_index: usize,
        rng: &mut R,
    ) -> Self {
        let start_angle = normalize_angle(current_angle + rng.random_range(START_NUDGE));
        let turns = rng.random_range(EXTRA_TURNS) + rng.random_range(JITTER_TURNS);

        let mut forward = table.center_angle(target_index) - start_angle;
        if forward < 0.0 {
            forward += TAU;
        }
        let target_angle = start_angle + f64::from(turns) * TAU + forward;

        let duration =
            Duration::from_millis(MIN_DURATION_MS + rng.random_range(0..DURATION_SPREAD_MS));

        Self {
            target_index,
            start_angle,
            target_angle,
            duration,
            easing: Easing::random(rng),
        }
    }

    /// Whole turns travelled, ignoring the final partial turn.
    #[must_use]
    pub fn full_turns(&self) -> u32 {
        ((self.target_angle - self.start_angle) / TAU).floor() as u32
    }
}
