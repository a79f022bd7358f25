//! Entrance animations for overlay slots.

use std::time::Duration;

use super::animation::{AnimPhase, EffectTimer};
use crate::overlay::OverlayKind;

const POP_DURATION: Duration = Duration::from_millis(220);
const SLIDE_DURATION: Duration = Duration::from_millis(260);
const SHAKE_DURATION: Duration = Duration::from_millis(360);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEffectKind {
    PopScale,
    SlideUp,
    Shake,
}

#[derive(Debug, Clone)]
pub struct OverlayEffect {
    kind: OverlayEffectKind,
    timer: EffectTimer,
}

impl OverlayEffect {
    #[must_use]
    pub fn new(kind: OverlayEffectKind, duration: Duration) -> Self {
        Self {
            kind,
            timer: EffectTimer::new(duration),
        }
    }

    /// Effect matching a slot: errors shake, turn changes slide in,
    /// persistent slots pop.
    #[must_use]
    pub fn for_slot(kind: OverlayKind, is_error: bool) -> Self {
        match (kind, is_error) {
            (OverlayKind::Error, _) | (OverlayKind::TurnChange, true) => {
                Self::new(OverlayEffectKind::Shake, SHAKE_DURATION)
            }
            (OverlayKind::TurnChange, false) => {
                Self::new(OverlayEffectKind::SlideUp, SLIDE_DURATION)
            }
            (OverlayKind::Victory | OverlayKind::Confirm, _) => {
                Self::new(OverlayEffectKind::PopScale, POP_DURATION)
            }
        }
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.advance(delta);
    }

    #[must_use]
    pub fn phase(&self) -> AnimPhase {
        self.timer.phase()
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    #[must_use]
    pub fn kind(&self) -> OverlayEffectKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{AnimPhase, OverlayEffect, OverlayEffectKind};
    use crate::overlay::OverlayKind;

    #[test]
    fn slot_kinds_pick_their_effect() {
        let cases = [
            (OverlayKind::Error, false, OverlayEffectKind::Shake),
            (OverlayKind::TurnChange, true, OverlayEffectKind::Shake),
            (OverlayKind::TurnChange, false, OverlayEffectKind::SlideUp),
            (OverlayKind::Victory, false, OverlayEffectKind::PopScale),
            (OverlayKind::Confirm, false, OverlayEffectKind::PopScale),
        ];
        for (kind, is_error, expected) in cases {
            assert_eq!(OverlayEffect::for_slot(kind, is_error).kind(), expected);
        }
    }

    #[test]
    fn starts_running() {
        let effect = OverlayEffect::new(OverlayEffectKind::PopScale, Duration::from_millis(200));
        assert!(matches!(effect.phase(), AnimPhase::Running { progress } if progress < 0.1));
    }

    #[test]
    fn completes_after_duration() {
        let mut effect = OverlayEffect::new(OverlayEffectKind::Shake, Duration::from_millis(100));
        effect.advance(Duration::from_millis(150));
        assert!(matches!(effect.phase(), AnimPhase::Completed));
        assert!((effect.progress() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_duration_is_immediately_completed() {
        let effect = OverlayEffect::new(OverlayEffectKind::SlideUp, Duration::ZERO);
        assert!(matches!(effect.phase(), AnimPhase::Completed));
    }
}
