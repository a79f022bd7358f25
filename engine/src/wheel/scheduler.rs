//! Single-writer arbitration between animation drivers.

use std::time::Instant;

use super::driver::{AnimationDriver, DriverKind, DriverStep, FreeDecay};

/// Decides which driver steps the wheel angle.
///
/// At most one driver is live. A free-decay driver displaced by
/// [`activate`](Self::activate) or [`suspend_free_decay`](Self::suspend_free_decay)
/// is parked rather than dropped, so the wheel can coast again if the spin
/// that displaced it never lands.
#[derive(Debug)]
pub struct TransitionScheduler {
    live: Option<AnimationDriver>,
    parked: Option<FreeDecay>,
}

impl TransitionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: Some(AnimationDriver::FreeDecay(FreeDecay::at_rest())),
            parked: None,
        }
    }

    #[must_use]
    pub fn live_kind(&self) -> Option<DriverKind> {
        self.live.as_ref().map(AnimationDriver::kind)
    }

    #[must_use]
    pub fn has_parked(&self) -> bool {
        self.parked.is_some()
    }

    /// Stop a live free-decay driver without installing another.
    pub fn suspend_free_decay(&mut self) {
        match self.live.take() {
            Some(AnimationDriver::FreeDecay(decay)) => self.parked = Some(decay),
            other => self.live = other,
        }
    }

    /// Suspend whatever is live and install `driver`.
    pub fn activate(&mut self, driver: AnimationDriver) {
        match self.live.take() {
            Some(AnimationDriver::FreeDecay(decay)) => self.parked = Some(decay),
            Some(AnimationDriver::CommittedTransition(_)) => {
                tracing::debug!("committed transition replaced before completion");
            }
            None => {}
        }
        if matches!(driver, AnimationDriver::FreeDecay(_)) {
            self.parked = None;
        }
        self.live = Some(driver);
    }

    /// Bring a parked free-decay driver back if nothing else is live.
    pub fn resume_parked(&mut self) {
        if self.live.is_none() {
            let decay = self.parked.take().unwrap_or_else(FreeDecay::at_rest);
            self.live = Some(AnimationDriver::FreeDecay(decay));
        }
    }

    /// Retire the live driver and leave a stopped free-decay driver in its
    /// place, so late reads of the angle stay where the wheel came to rest.
    pub fn deactivate(&mut self) {
        self.parked = None;
        self.live = Some(AnimationDriver::FreeDecay(FreeDecay::at_rest()));
    }

    /// Advance the live driver. This is the only way the angle changes.
    pub fn step(&mut self, angle: f64, now: Instant) -> DriverStep {
        match self.live.as_mut() {
            Some(driver) => driver.step(angle, now),
            None => DriverStep {
                angle,
                completed: false,
            },
        }
    }

    /// Drop every driver. Stepping afterwards leaves the angle unchanged.
    pub fn release(&mut self) {
        self.live = None;
        self.parked = None;
    }
}

impl Default for TransitionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::TransitionScheduler;
    use crate::wheel::driver::{AnimationDriver, CommittedTransition, DriverKind, FreeDecay};
    use crate::wheel::easing::Easing;

    fn transition(start: Instant) -> AnimationDriver {
        AnimationDriver::CommittedTransition(CommittedTransition::new(
            0.0,
            7.0,
            start,
            Duration::from_secs(2),
            Easing::Glide,
        ))
    }

    #[test]
    fn starts_with_resting_free_decay() {
        let scheduler = TransitionScheduler::new();
        assert_eq!(scheduler.live_kind(), Some(DriverKind::FreeDecay));
    }

    #[test]
    fn suspend_parks_free_decay_and_freezes_angle() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.activate(AnimationDriver::FreeDecay(FreeDecay::with_velocity(0.4)));
        scheduler.suspend_free_decay();
        assert_eq!(scheduler.live_kind(), None);
        assert!(scheduler.has_parked());
        let step = scheduler.step(1.25, start + Duration::from_secs(1));
        assert!((step.angle - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn resume_restores_parked_driver() {
        let mut scheduler = TransitionScheduler::new();
        scheduler.activate(AnimationDriver::FreeDecay(FreeDecay::with_velocity(0.4)));
        scheduler.suspend_free_decay();
        scheduler.resume_parked();
        assert_eq!(scheduler.live_kind(), Some(DriverKind::FreeDecay));
        assert!(!scheduler.has_parked());
    }

    #[test]
    fn activate_replaces_live_driver() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.activate(transition(start));
        assert_eq!(scheduler.live_kind(), Some(DriverKind::CommittedTransition));
        assert!(scheduler.has_parked());
    }

    #[test]
    fn deactivate_leaves_wheel_at_rest() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.activate(transition(start));
        let landed = scheduler.step(0.0, start + Duration::from_secs(2));
        assert!(landed.completed);

        scheduler.deactivate();
        assert_eq!(scheduler.live_kind(), Some(DriverKind::FreeDecay));
        assert!(!scheduler.has_parked());
        let later = scheduler.step(landed.angle, start + Duration::from_secs(5));
        let later = scheduler.step(later.angle, start + Duration::from_secs(6));
        assert!((later.angle - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn release_drops_everything() {
        let start = Instant::now();
        let mut scheduler = TransitionScheduler::new();
        scheduler.activate(transition(start));
        scheduler.release();
        assert_eq!(scheduler.live_kind(), None);
        let step = scheduler.step(3.0, start + Duration::from_secs(3));
        assert!(!step.completed);
        assert!((step.angle - 3.0).abs() < f64::EPSILON);
    }
}
