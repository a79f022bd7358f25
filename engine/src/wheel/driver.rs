//! The two ways the wheel can move.
//!
//! `FreeDecay` is undirected filler motion: a velocity that bleeds off by a
//! fixed friction factor every frame. `CommittedTransition` is the landing:
//! a time-driven interpolation from a start angle to a target angle whose
//! completion is reported exactly once.

use std::ops::Range;
use std::time::{Duration, Instant};

use rand::Rng;

use super::easing::Easing;

/// Velocity multiplier applied once per simulated frame.
pub const FRICTION: f64 = 0.991;
/// Velocities below this (radians per frame) snap to zero.
pub const STOP_EPSILON: f64 = 0.002;
/// Simulation quantum for free decay.
pub const DECAY_FRAME: Duration = Duration::from_micros(16_667);
/// Initial velocity range (radians per frame) for a coasting wheel.
pub const COAST_VELOCITY: Range<f64> = 0.2..0.6;
/// Frames simulated at most per step; a stalled renderer does not make the
/// wheel jump half a minute ahead.
const MAX_CATCH_UP_FRAMES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    FreeDecay,
    CommittedTransition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreeDecay {
    velocity: f64,
    carry: Duration,
    last_step: Option<Instant>,
}

impl FreeDecay {
    #[must_use]
    pub fn with_velocity(velocity: f64) -> Self {
        Self {
            velocity: if velocity.abs() < STOP_EPSILON {
                0.0
            } else {
                velocity
            },
            carry: Duration::ZERO,
            last_step: None,
        }
    }

    /// A stopped wheel that keeps the angle where it is.
    #[must_use]
    pub fn at_rest() -> Self {
        Self::with_velocity(0.0)
    }

    /// A wheel coasting at a random velocity.
    pub fn coasting<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_velocity(rng.random_range(COAST_VELOCITY))
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.velocity == 0.0
    }

    fn step(&mut self, angle: f64, now: Instant) -> f64 {
        let Some(last) = self.last_step.replace(now) else {
            return angle;
        };
        if self.is_stopped() {
            self.carry = Duration::ZERO;
            return angle;
        }

        self.carry += now.saturating_duration_since(last);
        let mut angle = angle;
        let mut frames = 0;
        while self.carry >= DECAY_FRAME && frames < MAX_CATCH_UP_FRAMES {
            self.carry -= DECAY_FRAME;
            frames += 1;
            angle += self.velocity;
            self.velocity *= FRICTION;
            if self.velocity.abs() < STOP_EPSILON {
                self.velocity = 0.0;
                self.carry = Duration::ZERO;
                break;
            }
        }
        if frames == MAX_CATCH_UP_FRAMES {
            self.carry = Duration::ZERO;
        }
        angle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Pending,
    Fired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommittedTransition {
    start_angle: f64,
    target_angle: f64,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
    completion: Completion,
}

impl CommittedTransition {
    #[must_use]
    pub fn new(
        start_angle: f64,
        target_angle: f64,
        started_at: Instant,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            start_angle,
            target_angle,
            started_at,
            duration,
            easing,
            completion: Completion::Pending,
        }
    }

    #[must_use]
    pub fn target_angle(&self) -> f64 {
        self.target_angle
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Angle at `now`. Exactly `target_angle` once the duration has passed.
    #[must_use]
    pub fn angle_at(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.target_angle;
        }
        self.start_angle + (self.target_angle - self.start_angle) * self.easing.ease(t)
    }

    /// `true` exactly once: on the first call at or after the end time.
    fn take_completion(&mut self, now: Instant) -> bool {
        if self.completion == Completion::Pending && self.progress(now) >= 1.0 {
            self.completion = Completion::Fired;
            return true;
        }
        false
    }
}

/// Result of stepping a driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverStep {
    pub angle: f64,
    /// The committed transition finished on this step.
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnimationDriver {
    FreeDecay(FreeDecay),
    CommittedTransition(CommittedTransition),
}

impl AnimationDriver {
    #[must_use]
    pub fn kind(&self) -> DriverKind {
        match self {
            Self::FreeDecay(_) => DriverKind::FreeDecay,
            Self::CommittedTransition(_) => DriverKind::CommittedTransition,
        }
    }

    pub(crate) fn step(&mut self, angle: f64, now: Instant) -> DriverStep {
        match self {
            Self::FreeDecay(decay) => DriverStep {
                angle: decay.step(angle, now),
                completed: false,
            },
            Self::CommittedTransition(transition) => DriverStep {
                angle: transition.angle_at(now),
                completed: transition.take_completion(now),
            },
        }
    }
}
