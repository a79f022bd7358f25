//! The app talking to a real HTTP game server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use fortuna_engine::{App, AppSettings, Screen};
use fortuna_types::PlayerRoster;

use crate::common::{Clock, app_for, mount_error, settings_for, start_game_server};

fn roster(names: &[&str]) -> PlayerRoster {
    PlayerRoster::new(names).expect("roster")
}

#[test]
fn app_refuses_unusable_server_urls() {
    for url in ["not a url", "ftp://example.test"] {
        let settings = AppSettings {
            server_url: url.to_string(),
            ..AppSettings::default()
        };
        assert!(App::new(settings).is_err(), "{url} accepted");
    }
}

#[tokio::test]
async fn new_game_is_posted_under_the_base_path() {
    let server = start_game_server().await;
    Mock::given(method("POST"))
        .and(path("/api/new-game"))
        .and(body_json(json!({ "num_players": 2, "player_names": ["Ada", "Grace"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "game_id": "g7",
            "topic": "Rivers",
            "masked": "_ _ _ _",
            "current_player_idx": 1,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.server_url = format!("{}/api", server.uri());
    let mut app = App::new(settings).expect("app");
    let mut clock = Clock::new();

    app.start_game(roster(&["Ada", "Grace"]), clock.now());
    clock.settle(&mut app, |app| app.game_id().is_some()).await;

    assert_eq!(app.game_id(), Some("g7"));
    assert_eq!(app.mirror().topic, "Rivers");
    assert_eq!(app.mirror().active_player_name(), Some("Grace"));
}

#[tokio::test]
async fn server_rejection_text_reaches_the_setup_screen() {
    let server = start_game_server().await;
    mount_error(
        &server,
        "/new-game",
        422,
        json!({ "detail": [{ "msg": "too many players" }] }),
    )
    .await;

    let mut app = app_for(&server);
    let mut clock = Clock::new();
    app.start_game(roster(&["Ada"]), clock.now());
    clock.settle(&mut app, |app| !app.is_starting()).await;

    assert_eq!(app.screen(), Screen::Setup);
    assert_eq!(app.setup().error(), Some("too many players"));
}

#[tokio::test]
async fn unreachable_server_reports_a_network_error() {
    let settings = AppSettings {
        // Port 9 (discard) is not expected to accept connections.
        server_url: "http://127.0.0.1:9".to_string(),
        ..AppSettings::default()
    };
    let mut app = App::new(settings).expect("app");
    let mut clock = Clock::new();
    app.start_game(roster(&["Ada"]), clock.now());
    clock.settle(&mut app, |app| !app.is_starting()).await;

    assert_eq!(app.screen(), Screen::Setup);
    assert_eq!(app.setup().error(), Some("Could not reach the game server"));
}
