//! Game orchestration.
//!
//! [`App`] wires the spin engine, the state reconciler and the overlay
//! coordinator to the game server. The TUI drives it with input calls and a
//! per-frame [`App::tick`]; nothing here blocks. Every server call is
//! spawned and polled from `tick`, one at a time.

mod setup;

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fortuna_client::{ClientError, GameServer, HttpGameServer};
use fortuna_types::ui::{LetterFlash, OverlayEffect, ScorePulse, ViewState};
use fortuna_types::{
    GameStateMirror, GuessResponse, MessageKey, NewGameResponse, OverlayKind, OverlaySlot,
    PhraseGuessResponse, PlayerRoster, Snapshot, VOWEL_PRICE, is_vowel,
};

use crate::config::AppSettings;
use crate::errors::{ErrorFallback, error_message};
use crate::overlay::OverlayCoordinator;
use crate::reconcile::{MergeReport, StateReconciler};
use crate::request::{PendingRequest, RequestLost};
use crate::wheel::{SpinEngine, SpinEvent, SpinLanding};

pub use setup::SetupForm;

/// How long a wrong letter flashes before the server's answer is applied.
pub const WRONG_LETTER_DELAY: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Setup,
    Game,
}

/// Answer to the new-game confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewGameChoice {
    /// Back to the setup screen.
    ChangePlayers,
    /// Start over with the same roster.
    SamePlayers,
}

/// Whether a letter can be picked right now, for rendering the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState {
    Available,
    Used,
    Disabled,
}

// ============================================================================
// Pending actions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum ActionKind {
    NewGame { roster: PlayerRoster, first_player: usize },
    Letter(char),
    Phrase,
    BuyVowel,
    RevealVowel(char),
    SetScore,
}

#[derive(Debug)]
enum ActionResult {
    NewGame(Result<NewGameResponse, ClientError>),
    Letter(Result<GuessResponse, ClientError>),
    Phrase(Result<PhraseGuessResponse, ClientError>),
    Snapshot(Result<Snapshot, ClientError>),
}

/// The one non-spin server call in flight.
#[derive(Debug)]
struct PendingAction {
    generation: u64,
    kind: ActionKind,
    request: PendingRequest<ActionResult>,
}

/// A wrong-letter answer held back while the letter flashes.
#[derive(Debug)]
struct DeferredSnapshot {
    generation: u64,
    apply_at: Instant,
    snapshot: Snapshot,
}

#[derive(Debug, Clone)]
struct GameSession {
    game_id: String,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    screen: Screen,
    setup: SetupForm,
    server: Arc<dyn GameServer>,
    settings: AppSettings,
    rng: StdRng,
    /// Bumped on every game start and teardown. Results tagged with an
    /// older value are stale.
    generation: u64,
    session: Option<GameSession>,
    roster: Option<PlayerRoster>,
    reconciler: StateReconciler,
    spin: Option<SpinEngine>,
    overlay: OverlayCoordinator,
    view: ViewState,
    pending: Option<PendingAction>,
    deferred: Option<DeferredSnapshot>,
    vowel_mode: bool,
    phrase_draft: Option<String>,
    should_quit: bool,
}

impl App {
    /// An app talking HTTP to the configured server.
    pub fn new(settings: AppSettings) -> anyhow::Result<Self> {
        let server = HttpGameServer::new(&settings.server_url, settings.client)?;
        tracing::info!(server = %server.base_url(), "game server configured");
        let seed = rand::rng().random();
        Ok(Self::with_server(Arc::new(server), settings, seed))
    }

    #[must_use]
    pub fn with_server(server: Arc<dyn GameServer>, settings: AppSettings, seed: u64) -> Self {
        let view = ViewState::new(settings.ui, Instant::now());
        Self {
            screen: Screen::Setup,
            setup: SetupForm::new(&settings.players),
            server,
            settings,
            rng: StdRng::seed_from_u64(seed),
            generation: 0,
            session: None,
            roster: None,
            reconciler: StateReconciler::new(),
            spin: None,
            overlay: OverlayCoordinator::new(),
            view,
            pending: None,
            deferred: None,
            vowel_mode: false,
            phrase_draft: None,
            should_quit: false,
        }
    }

    // ------------------------------------------------------------------
    // Read access for rendering
    // ------------------------------------------------------------------

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn setup(&self) -> &SetupForm {
        &self.setup
    }

    pub fn setup_mut(&mut self) -> &mut SetupForm {
        &mut self.setup
    }

    #[must_use]
    pub fn mirror(&self) -> &GameStateMirror {
        self.reconciler.mirror()
    }

    #[must_use]
    pub fn spin_engine(&self) -> Option<&SpinEngine> {
        self.spin.as_ref()
    }

    #[must_use]
    pub fn overlay(&self) -> Option<&OverlaySlot> {
        self.overlay.current()
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    #[must_use]
    pub fn game_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.game_id.as_str())
    }

    #[must_use]
    pub fn vowel_mode(&self) -> bool {
        self.vowel_mode
    }

    #[must_use]
    pub fn phrase_draft(&self) -> Option<&str> {
        self.phrase_draft.as_deref()
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    /// Waiting for the server to create a game.
    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| matches!(p.kind, ActionKind::NewGame { .. }))
    }

    // ------------------------------------------------------------------
    // Gating
    // ------------------------------------------------------------------

    fn spin_busy(&self) -> bool {
        self.spin.as_ref().is_some_and(SpinEngine::is_busy)
    }

    fn action_busy(&self) -> bool {
        self.pending.is_some() || self.deferred.is_some()
    }

    fn modal_open(&self) -> bool {
        self.overlay.is_showing(OverlayKind::Victory)
            || self.overlay.is_showing(OverlayKind::Confirm)
    }

    /// A game is running and nothing is outstanding.
    fn ready(&self) -> bool {
        self.session.is_some()
            && !self.mirror().complete
            && !self.spin_busy()
            && !self.action_busy()
            && !self.modal_open()
    }

    #[must_use]
    pub fn spin_enabled(&self) -> bool {
        self.ready() && !self.mirror().can_guess && !self.vowel_mode
    }

    #[must_use]
    pub fn buy_vowel_enabled(&self) -> bool {
        self.ready()
            && !self.mirror().can_guess
            && !self.vowel_mode
            && self.mirror().active_score() >= VOWEL_PRICE
    }

    #[must_use]
    pub fn phrase_enabled(&self) -> bool {
        self.ready() && !self.vowel_mode
    }

    #[must_use]
    pub fn letter_state(&self, letter: char) -> LetterState {
        let letter = letter.to_ascii_uppercase();
        if self.mirror().used_letters.contains(letter) {
            return LetterState::Used;
        }
        let allowed = if is_vowel(letter) {
            self.vowel_mode
        } else {
            self.mirror().can_guess && !self.vowel_mode
        };
        if self.ready() && allowed {
            LetterState::Available
        } else {
            LetterState::Disabled
        }
    }

    // ------------------------------------------------------------------
    // Game lifecycle
    // ------------------------------------------------------------------

    /// Validate the setup form and start a game with it.
    pub fn submit_setup(&mut self, now: Instant) {
        if self.is_starting() {
            return;
        }
        if let Ok(roster) = self.setup.submit() {
            self.start_game(roster, now);
        }
    }

    /// Abandon whatever is running and ask the server for a fresh game.
    pub fn start_game(&mut self, roster: PlayerRoster, now: Instant) {
        self.reset_game_context();
        let first_player = self.rng.random_range(0..roster.len());
        tracing::info!(players = roster.len(), first_player, "starting game");

        self.spin = Some(SpinEngine::for_players(
            roster.len(),
            self.rng.random(),
            self.settings.degraded_spin_feedback,
        ));
        let request = PendingRequest::spawn(
            self.server
                .new_game(roster.names())
                .map(ActionResult::NewGame),
        );
        self.pending = Some(PendingAction {
            generation: self.generation,
            kind: ActionKind::NewGame {
                roster: roster.clone(),
                first_player,
            },
            request,
        });
        self.roster = Some(roster);
        self.screen = Screen::Game;
        self.view.last_frame = now;
    }

    /// Drop every per-game resource and move to a new generation.
    fn reset_game_context(&mut self) {
        self.generation += 1;
        if let Some(mut engine) = self.spin.take() {
            engine.teardown();
        }
        self.pending = None;
        self.deferred = None;
        self.session = None;
        self.reconciler.reset();
        self.overlay.clear();
        self.view.clear_effects();
        self.vowel_mode = false;
        self.phrase_draft = None;
    }

    /// Leave the game screen, releasing the wheel and any pending call.
    pub fn teardown(&mut self) {
        self.reset_game_context();
        self.screen = Screen::Setup;
    }

    pub fn request_new_game(&mut self, now: Instant) {
        if self.screen != Screen::Game || self.is_starting() {
            return;
        }
        self.overlay
            .dismiss_kinds(&[OverlayKind::Victory, OverlayKind::TurnChange]);
        self.show_overlay(OverlaySlot::confirm_new_game(), now);
    }

    pub fn confirm_new_game(&mut self, choice: NewGameChoice, now: Instant) {
        if !self.overlay.is_showing(OverlayKind::Confirm) {
            return;
        }
        self.dismiss_overlay();
        match choice {
            NewGameChoice::ChangePlayers => {
                if let Some(roster) = &self.roster {
                    self.setup = SetupForm::new(roster.names());
                }
                self.teardown();
            }
            NewGameChoice::SamePlayers => {
                if let Some(roster) = self.roster.clone() {
                    self.start_game(roster, now);
                }
            }
        }
    }

    pub fn dismiss_overlay(&mut self) {
        if self.overlay.dismiss().is_some() {
            self.view.overlay_effect = None;
        }
    }

    // ------------------------------------------------------------------
    // Player actions
    // ------------------------------------------------------------------

    pub fn request_spin(&mut self) {
        if self.modal_open() || self.action_busy() || self.mirror().complete || self.vowel_mode {
            return;
        }
        let (Some(session), Some(engine)) = (&self.session, self.spin.as_mut()) else {
            return;
        };
        let can_guess = self.reconciler.mirror().can_guess;
        if !engine
            .request_spin(can_guess, self.server.as_ref(), &session.game_id)
            .is_started()
        {
            tracing::debug!("spin request ignored");
        }
    }

    pub fn guess_letter(&mut self, letter: char, now: Instant) {
        if !letter.is_ascii_alphabetic() {
            return;
        }
        let letter = letter.to_ascii_uppercase();
        if self.session.is_none()
            || self.mirror().complete
            || self.spin_busy()
            || self.action_busy()
            || self.modal_open()
            || self.mirror().used_letters.contains(letter)
        {
            return;
        }

        if is_vowel(letter) {
            if self.vowel_mode {
                self.vowel_mode = false;
                self.spawn_action(ActionKind::RevealVowel(letter), |server, id| {
                    server
                        .reveal_vowel(id, letter)
                        .map(ActionResult::Snapshot)
                        .boxed()
                });
            }
            return;
        }
        if self.vowel_mode {
            self.show_overlay(OverlaySlot::error(MessageKey::SelectVowel), now);
            return;
        }
        if !self.mirror().can_guess {
            self.show_overlay(OverlaySlot::error(MessageKey::MustSpinFirst), now);
            return;
        }
        self.spawn_action(ActionKind::Letter(letter), |server, id| {
            server
                .guess_letter(id, letter)
                .map(ActionResult::Letter)
                .boxed()
        });
    }

    pub fn buy_vowel(&mut self, now: Instant) {
        if !self.ready() || self.mirror().can_guess || self.vowel_mode {
            return;
        }
        if self.mirror().active_score() < VOWEL_PRICE {
            self.show_overlay(OverlaySlot::error(MessageKey::LowMoney), now);
            return;
        }
        self.spawn_action(ActionKind::BuyVowel, |server, id| {
            server.buy_vowel(id).map(ActionResult::Snapshot).boxed()
        });
    }

    /// Leave vowel selection without choosing. The charge already made
    /// stays with the server.
    pub fn cancel_vowel(&mut self) {
        self.vowel_mode = false;
    }

    pub fn open_phrase(&mut self) {
        if self.phrase_enabled() && self.phrase_draft.is_none() {
            self.phrase_draft = Some(String::new());
        }
    }

    pub fn phrase_input(&mut self, c: char) {
        if let Some(draft) = self.phrase_draft.as_mut()
            && !c.is_control()
        {
            draft.push(c);
        }
    }

    pub fn phrase_backspace(&mut self) {
        if let Some(draft) = self.phrase_draft.as_mut() {
            draft.pop();
        }
    }

    pub fn cancel_phrase(&mut self) {
        self.phrase_draft = None;
    }

    pub fn submit_phrase(&mut self) {
        let Some(draft) = self.phrase_draft.as_ref() else {
            return;
        };
        let guess = draft.trim().to_string();
        if guess.is_empty() || !self.phrase_enabled() {
            return;
        }
        self.phrase_draft = None;
        self.spawn_action(ActionKind::Phrase, move |server, id| {
            server
                .guess_phrase(id, &guess)
                .map(ActionResult::Phrase)
                .boxed()
        });
    }

    fn spawn_action<F>(&mut self, kind: ActionKind, call: F)
    where
        F: FnOnce(&dyn GameServer, &str) -> BoxFuture<'static, ActionResult>,
    {
        let Some(session) = &self.session else {
            return;
        };
        tracing::debug!(?kind, "server action");
        let request = PendingRequest::spawn(call(self.server.as_ref(), &session.game_id));
        self.pending = Some(PendingAction {
            generation: self.generation,
            kind,
            request,
        });
    }

    // ------------------------------------------------------------------
    // Frame tick
    // ------------------------------------------------------------------

    /// Advance animations and timers to `now` and settle finished calls.
    pub fn tick(&mut self, now: Instant) {
        self.view.advance(now);
        if self.overlay.tick(now) {
            self.view.overlay_effect = None;
        }

        let event = self.spin.as_mut().and_then(|engine| engine.tick(now));
        if let Some(event) = event {
            self.on_spin_event(event, now);
        }

        self.poll_action(now);
        self.apply_deferred(now);
    }

    fn on_spin_event(&mut self, event: SpinEvent, now: Instant) {
        match event {
            SpinEvent::Landed(landing) => self.on_landed(landing, now),
            SpinEvent::Empty => {}
            SpinEvent::Failed(err) => {
                let message = error_message(&err, ErrorFallback::Server);
                self.show_overlay(OverlaySlot::error(message), now);
            }
        }
    }

    fn on_landed(&mut self, landing: SpinLanding, now: Instant) {
        let response = *landing.response;
        let mut snapshot = response.snapshot;
        if snapshot.last_spin.is_none() {
            snapshot.last_spin = Some(response.value.clone());
        }
        if response.value.is_bankrupt()
            && let Some(lost) = response.old_score.filter(|score| *score > 0)
            && let Some(player) = self.reconciler.mirror().active_player_name()
        {
            self.view.score_pulse = Some(ScorePulse::loss(player, lost));
        }
        self.merge_with_signals(&snapshot, now);
    }

    fn poll_action(&mut self, now: Instant) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(result) = pending.request.try_take() else {
            return;
        };
        let Some(PendingAction {
            generation, kind, ..
        }) = self.pending.take()
        else {
            return;
        };
        if generation != self.generation {
            tracing::debug!(?kind, "discarding stale server result");
            return;
        }

        match result {
            Ok(result) => self.on_action_result(kind, result, now),
            Err(RequestLost::Aborted | RequestLost::Panicked) => {
                tracing::debug!(?kind, "server action lost");
            }
        }
    }

    fn on_action_result(&mut self, kind: ActionKind, result: ActionResult, now: Instant) {
        match (kind, result) {
            (
                ActionKind::NewGame {
                    roster,
                    first_player,
                },
                ActionResult::NewGame(result),
            ) => self.on_new_game(roster, first_player, result, now),
            (ActionKind::Letter(letter), ActionResult::Letter(result)) => {
                self.on_letter(letter, result, now);
            }
            (ActionKind::Phrase, ActionResult::Phrase(result)) => self.on_phrase(result, now),
            (ActionKind::BuyVowel, ActionResult::Snapshot(result)) => match result {
                Ok(snapshot) => {
                    self.merge_with_signals(&snapshot, now);
                    self.vowel_mode = !self.mirror().complete;
                }
                Err(err) => self.show_error(&err, ErrorFallback::LowMoney, now),
            },
            (ActionKind::RevealVowel(_), ActionResult::Snapshot(result)) => match result {
                Ok(snapshot) => {
                    if let Some(player) = self.reconciler.mirror().active_player_name() {
                        self.view.score_pulse = Some(ScorePulse::loss(player, VOWEL_PRICE));
                    }
                    self.merge_with_signals(&snapshot, now);
                }
                Err(err) => self.show_error(&err, ErrorFallback::Server, now),
            },
            (ActionKind::SetScore, ActionResult::Snapshot(result)) => match result {
                Ok(snapshot) => {
                    self.merge_with_signals(&snapshot, now);
                }
                Err(err) => tracing::warn!("score write-back failed: {err}"),
            },
            (kind, result) => {
                tracing::error!(?kind, ?result, "server result does not match its request");
            }
        }
    }

    fn on_new_game(
        &mut self,
        roster: PlayerRoster,
        first_player: usize,
        result: Result<NewGameResponse, ClientError>,
        now: Instant,
    ) {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("new game failed: {err}");
                let message = error_message(&err, ErrorFallback::Server);
                self.teardown();
                self.setup.set_error(message.to_string());
                return;
            }
        };

        self.reconciler
            .begin(roster.names(), &response.snapshot, first_player);
        tracing::info!(game_id = %response.game_id, "game started");
        self.session = Some(GameSession {
            game_id: response.game_id,
        });

        if self.mirror().complete {
            self.show_overlay(OverlaySlot::victory(), now);
        } else {
            let active = self.mirror().active_player_name().map(str::to_owned);
            self.show_overlay(OverlaySlot::turn_change(MessageKey::TurnSpin, active), now);
        }
    }

    fn on_letter(
        &mut self,
        letter: char,
        result: Result<GuessResponse, ClientError>,
        now: Instant,
    ) {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.show_error(&err, ErrorFallback::Server, now);
                return;
            }
        };
        if response.added_score > 0 {
            if let Some(player) = self.reconciler.mirror().active_player_name() {
                self.view.score_pulse = Some(ScorePulse::gain(player, response.added_score));
            }
            self.merge_with_signals(&response.snapshot, now);
        } else {
            tracing::debug!(%letter, "letter not in phrase");
            self.view.letter_flash = Some(LetterFlash::wrong(letter));
            self.deferred = Some(DeferredSnapshot {
                generation: self.generation,
                apply_at: now + WRONG_LETTER_DELAY,
                snapshot: response.snapshot,
            });
        }
    }

    fn on_phrase(&mut self, result: Result<PhraseGuessResponse, ClientError>, now: Instant) {
        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.show_error(&err, ErrorFallback::Server, now);
                return;
            }
        };

        let guessing_player = self.mirror().active_player_name().map(str::to_owned);
        self.reconciler.apply(&response.snapshot);
        let active = self.mirror().active_player_name().map(str::to_owned);
        self.overlay.sync_active_player(active.as_deref());

        if response.snapshot.player_scores.is_none()
            && let (Some(total), Some(player)) = (response.total_score, guessing_player)
        {
            self.spawn_action(ActionKind::SetScore, move |server, id| {
                server
                    .set_score(id, &player, total)
                    .map(ActionResult::Snapshot)
                    .boxed()
            });
        }

        if response.success || self.mirror().complete {
            self.show_overlay(OverlaySlot::victory(), now);
            return;
        }
        let mirror = self.mirror();
        let slot = if !mirror.is_multiplayer() {
            Some(OverlaySlot::turn_change(MessageKey::WrongAnswerSingle, None))
        } else if response.snapshot.current_player_idx.is_some() {
            let next = mirror.active_player_name().map(str::to_owned);
            Some(OverlaySlot::turn_change(MessageKey::WrongAnswerTurn, next))
        } else {
            tracing::debug!("wrong phrase without a next player, keeping the turn");
            None
        };
        if let Some(slot) = slot {
            self.show_overlay(slot.with_error_style(), now);
        }
    }

    fn apply_deferred(&mut self, now: Instant) {
        if self.deferred.as_ref().is_none_or(|d| now < d.apply_at) {
            return;
        }
        let Some(deferred) = self.deferred.take() else {
            return;
        };
        if deferred.generation != self.generation {
            tracing::debug!("discarding stale deferred snapshot");
            return;
        }
        self.view.letter_flash = None;
        self.merge_with_signals(&deferred.snapshot, now);
    }

    /// Merge a snapshot and raise the notifications it implies.
    fn merge_with_signals(&mut self, snapshot: &Snapshot, now: Instant) -> MergeReport {
        let report = self.reconciler.apply(snapshot);
        let mirror = self.reconciler.mirror();
        let turn_changed = report.turn_changed.is_some() && mirror.is_multiplayer();
        let finished = mirror.complete;
        let active = mirror.active_player_name().map(str::to_owned);

        if report.completed {
            self.vowel_mode = false;
            self.show_overlay(OverlaySlot::victory(), now);
        } else if !finished
            && self.overlay.apply_turn_signals(
                report.swapped_player.clone(),
                active.as_deref(),
                turn_changed,
                now,
            )
        {
            self.start_overlay_effect();
        }
        self.overlay.sync_active_player(active.as_deref());
        report
    }

    fn show_error(&mut self, err: &ClientError, fallback: ErrorFallback, now: Instant) {
        tracing::warn!("server action failed: {err}");
        self.show_overlay(OverlaySlot::error(error_message(err, fallback)), now);
    }

    fn show_overlay(&mut self, slot: OverlaySlot, now: Instant) {
        self.overlay.show(slot, now);
        self.start_overlay_effect();
    }

    fn start_overlay_effect(&mut self) {
        self.view.overlay_effect = match self.overlay.current() {
            Some(slot) if !self.view.ui_options.reduced_motion => {
                Some(OverlayEffect::for_slot(slot.kind, slot.is_error))
            }
            _ => None,
        };
    }
}
