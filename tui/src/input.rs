//! Input handling for the Fortuna TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tracing::debug;

use fortuna_engine::{App, NewGameChoice, OverlayKind, Screen};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame
/// loop through a bounded channel.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a backpressured send unblocks.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending terminal events into `app`. Returns `true` once the app
/// wants to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev, Instant::now()) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` once the app wants to quit.
pub fn apply_event(app: &mut App, event: Event, now: Instant) -> bool {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c' | 'q'))
            {
                app.request_quit();
                return true;
            }
            match app.screen() {
                Screen::Setup => handle_setup_key(app, key, now),
                Screen::Game => handle_game_key(app, key, now),
            }
        }
        Event::Paste(text) => {
            if app.screen() == Screen::Setup {
                for c in text.chars() {
                    app.setup_mut().push_char(c);
                }
            } else if app.phrase_draft().is_some() {
                for c in text.chars().filter(|c| !c.is_control()) {
                    app.phrase_input(c);
                }
            }
        }
        _ => {}
    }
    app.should_quit()
}

fn handle_setup_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc => app.request_quit(),
        KeyCode::Enter => app.submit_setup(now),
        KeyCode::Tab | KeyCode::Down => app.setup_mut().focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.setup_mut().focus_prev(),
        KeyCode::Right => app.setup_mut().add_player(),
        KeyCode::Left => app.setup_mut().remove_player(),
        KeyCode::Backspace => app.setup_mut().backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.setup_mut().push_char(c);
        }
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.phrase_draft().is_some() {
        match key.code {
            KeyCode::Esc => app.cancel_phrase(),
            KeyCode::Enter => app.submit_phrase(),
            KeyCode::Backspace => app.phrase_backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.phrase_input(c);
            }
            _ => {}
        }
        return;
    }

    if app.overlay().is_some_and(|slot| slot.kind == OverlayKind::Confirm) {
        match key.code {
            KeyCode::Char('y' | 'Y') => app.confirm_new_game(NewGameChoice::ChangePlayers, now),
            KeyCode::Char('s' | 'S') => app.confirm_new_game(NewGameChoice::SamePlayers, now),
            KeyCode::Esc => app.dismiss_overlay(),
            _ => {}
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('v') => app.buy_vowel(now),
            KeyCode::Char('p') => app.open_phrase(),
            KeyCode::Char('n') => app.request_new_game(now),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char(' ') => app.request_spin(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => app.guess_letter(c, now),
        KeyCode::Esc if app.vowel_mode() => app.cancel_vowel(),
        KeyCode::Enter | KeyCode::Esc => app.dismiss_overlay(),
        other => debug!(?other, "unbound key"),
    }
}
