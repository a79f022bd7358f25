//! Core engine for Fortuna - wheel animation, state reconciliation and game
//! orchestration.
//!
//! This crate contains the [`App`] state machine without TUI dependencies.
//! The server stays authoritative: the engine animates the wheel toward the
//! outcome the server picked and mirrors whatever state it reports.

mod app;
mod config;
mod errors;
mod overlay;
mod reconcile;
mod request;
mod wheel;

pub use app::{App, LetterState, NewGameChoice, Screen, SetupForm, WRONG_LETTER_DELAY};
pub use config::{
    AppSettings, ConfigError, FortunaConfig, GameConfig, PLAYERS_ENV, SERVER_URL_ENV,
    ServerConfig, UiConfig, config_path, expand_env_vars,
};
pub use errors::{ErrorFallback, error_message};
pub use overlay::OverlayCoordinator;
pub use reconcile::{MergeReport, StateReconciler, merge};
pub use wheel::{
    AnimationDriver, CommittedTransition, CubicBezier, DriverKind, DriverStep, Easing, FreeDecay,
    LandingPlan, SpinEngine, SpinEvent, SpinLanding, SpinPhase, SpinRejection, SpinRequest,
    TransitionScheduler,
};

// Re-export from crates for public API
pub use fortuna_client::{self, ClientError, ClientSettings, GameServer, HttpGameServer};
pub use fortuna_types::{
    self, GameStateMirror, MessageKey, OutcomeTag, OverlayKind, OverlayMessage, OverlaySlot,
    PlayerRoster, RosterError, Rgb, Sector, SectorTable, SpinValue, VOWEL_PRICE, VOWELS,
    is_vowel,
};
