//! The spinning wheel.
//!
//! [`SpinEngine`] owns the wheel angle and drives it through the
//! [`TransitionScheduler`]. A spin is a small state machine:
//!
//! ```text
//! Idle --request_spin--> AwaitingOutcome --outcome--> Landing --landed--> Idle
//!                              |
//!                              +--empty / failed / lost--> Idle
//! ```
//!
//! The engine never decides an outcome. It asks the server, maps the answer
//! onto a sector and animates toward that sector until the wheel rests on it.

mod driver;
mod easing;
mod landing;
mod scheduler;

use std::fmt;
use std::mem;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use fortuna_client::{ClientError, GameServer};
use fortuna_types::{Sector, SectorMatch, SectorTable, SpinResponse};

use crate::request::{PendingRequest, RequestLost};

pub use driver::{
    AnimationDriver, COAST_VELOCITY, CommittedTransition, DECAY_FRAME, DriverKind, DriverStep,
    FRICTION, FreeDecay, STOP_EPSILON,
};
pub use easing::{CubicBezier, Easing};
pub use landing::{
    DURATION_SPREAD_MS, EXTRA_TURNS, JITTER_TURNS, LandingPlan, MIN_DURATION_MS, START_NUDGE,
};
pub use scheduler::TransitionScheduler;

type SpinResult = Result<Option<SpinResponse>, ClientError>;

enum SpinState {
    Idle,
    AwaitingOutcome(PendingRequest<SpinResult>),
    Landing {
        response: Box<SpinResponse>,
        target: SectorMatch,
    },
    Released,
}

/// Observable phase of the current spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    AwaitingOutcome,
    Landing,
    Released,
}

/// Why a spin request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRejection {
    /// A spin is already awaiting its outcome or landing.
    InFlight,
    /// The previous outcome still has to be used for a guess.
    OutcomePending,
    /// The engine was torn down.
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinRequest {
    Started,
    Rejected(SpinRejection),
}

impl SpinRequest {
    #[must_use]
    pub fn is_started(self) -> bool {
        self == Self::Started
    }
}

/// The wheel came to rest on the server's outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinLanding {
    pub response: Box<SpinResponse>,
    pub sector: usize,
    /// `false` when the outcome matched no sector and a random one was used.
    pub exact: bool,
}

/// What a [`SpinEngine::tick`] finished.
#[derive(Debug)]
pub enum SpinEvent {
    Landed(SpinLanding),
    /// The server answered without an outcome.
    Empty,
    Failed(ClientError),
}

pub struct SpinEngine {
    table: SectorTable,
    angle: f64,
    scheduler: TransitionScheduler,
    state: SpinState,
    rng: StdRng,
    degraded_feedback: bool,
}

impl SpinEngine {
    /// An engine for a wheel built for `player_count` players.
    #[must_use]
    pub fn for_players(player_count: usize, seed: u64, degraded_feedback: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let table = SectorTable::build(player_count, &mut rng);
        Self::with_table(table, rng, degraded_feedback)
    }

    #[must_use]
    pub fn with_table(table: SectorTable, rng: StdRng, degraded_feedback: bool) -> Self {
        Self {
            table,
            angle: 0.0,
            scheduler: TransitionScheduler::new(),
            state: SpinState::Idle,
            rng,
            degraded_feedback,
        }
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    #[must_use]
    pub fn table(&self) -> &SectorTable {
        &self.table
    }

    #[must_use]
    pub fn sector_under_pointer(&self) -> &Sector {
        self.table.sector_at(self.angle)
    }

    #[must_use]
    pub fn driver_kind(&self) -> Option<DriverKind> {
        self.scheduler.live_kind()
    }

    #[must_use]
    pub fn phase(&self) -> SpinPhase {
        match self.state {
            SpinState::Idle => SpinPhase::Idle,
            SpinState::AwaitingOutcome(_) => SpinPhase::AwaitingOutcome,
            SpinState::Landing { .. } => SpinPhase::Landing,
            SpinState::Released => SpinPhase::Released,
        }
    }

    /// A spin is awaiting its outcome or landing.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            SpinState::AwaitingOutcome(_) | SpinState::Landing { .. }
        )
    }

    /// Ask the server for an outcome and start waiting for it.
    ///
    /// Does nothing while another spin is outstanding or while
    /// `can_guess` says the last outcome has not been used yet.
    pub fn request_spin(
        &mut self,
        can_guess: bool,
        server: &dyn GameServer,
        game_id: &str,
    ) -> SpinRequest {
        match self.state {
            SpinState::Idle => {}
            SpinState::Released => return SpinRequest::Rejected(SpinRejection::Released),
            SpinState::AwaitingOutcome(_) | SpinState::Landing { .. } => {
                return SpinRequest::Rejected(SpinRejection::InFlight);
            }
        }
        if can_guess {
            return SpinRequest::Rejected(SpinRejection::OutcomePending);
        }

        self.scheduler.suspend_free_decay();
        self.state = SpinState::AwaitingOutcome(PendingRequest::spawn(server.spin(game_id)));
        tracing::debug!(game_id, "spin requested");
        SpinRequest::Started
    }

    /// Advance the wheel to `now` and settle whatever finished.
    pub fn tick(&mut self, now: Instant) -> Option<SpinEvent> {
        if matches!(self.state, SpinState::Released) {
            return None;
        }

        let step = self.scheduler.step(self.angle, now);
        self.angle = step.angle;

        if step.completed {
            return self.finish_landing();
        }

        let SpinState::AwaitingOutcome(request) = &mut self.state else {
            return None;
        };
        let result = request.try_take()?;
        self.state = SpinState::Idle;

        match result {
            Ok(Ok(Some(response))) => {
                self.begin_landing(response, now);
                None
            }
            Ok(Ok(None)) => {
                tracing::debug!("spin returned no outcome");
                self.scheduler.resume_parked();
                Some(SpinEvent::Empty)
            }
            Ok(Err(err)) => {
                tracing::warn!("spin request failed: {err}");
                if self.degraded_feedback {
                    let coast = FreeDecay::coasting(&mut self.rng);
                    self.scheduler.activate(AnimationDriver::FreeDecay(coast));
                } else {
                    self.scheduler.deactivate();
                }
                Some(SpinEvent::Failed(err))
            }
            Err(RequestLost::Aborted | RequestLost::Panicked) => {
                tracing::debug!("spin request lost before resolving");
                self.scheduler.resume_parked();
                None
            }
        }
    }

    fn begin_landing(&mut self, response: SpinResponse, now: Instant) {
        let target = self.table.resolve(&response.value, &mut self.rng);
        if !target.exact {
            tracing::warn!(
                value = %response.value,
                sector = target.index,
                "spin outcome matches no sector, landing on a random one"
            );
        }

        let plan = LandingPlan::compute(&self.table, self.angle, target.index, &mut self.rng);
        tracing::debug!(
            sector = target.index,
            turns = plan.full_turns(),
            duration_ms = plan.duration.as_millis(),
            "landing"
        );
        self.angle = plan.start_angle;
        self.scheduler
            .activate(AnimationDriver::CommittedTransition(CommittedTransition::new(
                plan.start_angle,
                plan.target_angle,
                now,
                plan.duration,
                plan.easing,
            )));
        self.state = SpinState::Landing {
            response: Box::new(response),
            target,
        };
    }

    fn finish_landing(&mut self) -> Option<SpinEvent> {
        let SpinState::Landing { response, target } =
            mem::replace(&mut self.state, SpinState::Idle)
        else {
            return None;
        };
        self.angle = self.table.center_angle(target.index);
        self.scheduler.deactivate();
        tracing::info!(sector = target.index, value = %response.value, "wheel landed");
        Some(SpinEvent::Landed(SpinLanding {
            response,
            sector: target.index,
            exact: target.exact,
        }))
    }

    /// Abort the outstanding request and stop every driver. Nothing fires
    /// afterwards; ticking a released engine is a no-op.
    pub fn teardown(&mut self) {
        if let SpinState::AwaitingOutcome(request) = &self.state {
            request.abort();
        }
        self.scheduler.release();
        self.state = SpinState::Released;
    }
}

impl Drop for SpinEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for SpinEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinEngine")
            .field("angle", &self.angle)
            .field("phase", &self.phase())
            .field("sectors", &self.table.len())
            .finish_non_exhaustive()
    }
}
