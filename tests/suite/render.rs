//! Screens rendered from live app state.

use serde_json::json;

use fortuna_engine::{App, AppSettings};
use fortuna_types::PlayerRoster;
use fortuna_types::ui::UiOptions;

use crate::common::{Clock, mount_json, render, settings_for, start_game_server};

async fn running_game(settings: AppSettings, clock: &mut Clock) -> App {
    let mut app = App::new(settings).expect("app");
    app.start_game(
        PlayerRoster::new(&["Ada", "Grace"]).expect("roster"),
        clock.now(),
    );
    clock.settle(&mut app, |app| app.game_id().is_some()).await;
    app
}

#[tokio::test]
async fn game_screen_shows_board_players_and_turn() {
    let server = start_game_server().await;
    mount_json(
        &server,
        "/new-game",
        json!({
            "game_id": "g1",
            "topic": "Animals",
            "masked": "_ _ _",
            "current_player_idx": 1,
            "player_scores": { "Ada": 300, "Grace": 1200 },
        }),
    )
    .await;

    let mut clock = Clock::new();
    let app = running_game(settings_for(&server), &mut clock).await;
    let text = render(&app, 100, 30);

    assert!(text.contains("Animals"), "{text}");
    assert!(text.contains("Ada"));
    assert!(text.contains("1200"));
    assert!(text.contains("Spin the wheel"));
    assert!(text.contains("game g1"));
}

#[tokio::test]
async fn victory_overlay_ranks_players() {
    let server = start_game_server().await;
    mount_json(
        &server,
        "/new-game",
        json!({ "game_id": "g1", "topic": "Animals", "masked": "_ _ _", "current_player_idx": 0 }),
    )
    .await;
    mount_json(
        &server,
        "/guess-phrase",
        json!({
            "success": true,
            "total_score": 900,
            "masked": "C A T",
            "complete": true,
            "player_scores": { "Ada": 900, "Grace": 400 },
        }),
    )
    .await;

    let mut clock = Clock::new();
    let mut app = running_game(settings_for(&server), &mut clock).await;
    app.open_phrase();
    for c in "cat".chars() {
        app.phrase_input(c);
    }
    app.submit_phrase();
    clock.settle(&mut app, |app| app.mirror().complete).await;

    let text = render(&app, 100, 30);
    assert!(text.contains("Phrase solved!"), "{text}");
    assert!(text.contains("1. Ada 900"));
    assert!(text.contains("2. Grace 400"));
}

#[tokio::test]
async fn accessible_variants_render() {
    let server = start_game_server().await;
    mount_json(
        &server,
        "/new-game",
        json!({ "game_id": "g1", "topic": "Animals", "masked": "_ _ _", "current_player_idx": 0 }),
    )
    .await;

    for ui in [
        UiOptions {
            ascii_only: true,
            high_contrast: false,
            reduced_motion: true,
        },
        UiOptions {
            ascii_only: false,
            high_contrast: true,
            reduced_motion: false,
        },
    ] {
        let settings = AppSettings {
            ui,
            ..settings_for(&server)
        };
        let mut clock = Clock::new();
        let app = running_game(settings, &mut clock).await;
        render(&app, 40, 12);
        let text = render(&app, 100, 30);
        assert!(text.contains("Animals"));
        assert_eq!(text.contains("_ _ _"), ui.ascii_only, "{text}");
        assert_eq!(text.contains('▁'), !ui.ascii_only);
    }
}
