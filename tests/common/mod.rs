//! Shared test utilities and fixtures
//!
//! A wiremock game server plus helpers for driving an [`App`] against it
//! with a virtual frame clock.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fortuna_engine::{App, AppSettings};

/// Virtual time advanced per settle step. Larger than a real frame so wheel
/// landings finish in a handful of real milliseconds.
pub const FRAME_STEP: Duration = Duration::from_millis(50);
const SETTLE_LIMIT: usize = 600;

/// Start a mock game server.
pub async fn start_game_server() -> MockServer {
    MockServer::start().await
}

/// Answer every POST to `route` with `body`.
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer the next POST to `route` with `body`. Mounted answers are used in
/// mount order.
pub async fn mount_once(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// Answer every POST to `route` with an error status and JSON body.
pub async fn mount_error(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub fn settings_for(server: &MockServer) -> AppSettings {
    AppSettings {
        server_url: server.uri(),
        ..AppSettings::default()
    }
}

pub fn app_for(server: &MockServer) -> App {
    App::new(settings_for(server)).expect("app")
}

/// Monotonic clock handed to `App::tick`.
pub struct Clock {
    now: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    /// Tick `app` until `done` holds, yielding to the runtime between frames.
    pub async fn settle(&mut self, app: &mut App, done: impl Fn(&App) -> bool) {
        for _ in 0..SETTLE_LIMIT {
            app.tick(self.now);
            if done(app) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.advance(FRAME_STEP);
        }
        panic!("app did not settle");
    }
}

/// Render `app` into a test terminal and return the screen as text.
pub fn render(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal
        .draw(|frame| fortuna_tui::draw(frame, app))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .chunks(usize::from(buffer.area.width))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
