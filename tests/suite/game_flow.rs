//! Whole games played against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fortuna_engine::{App, NewGameChoice, Screen, SpinPhase};
use fortuna_types::ui::PulseDirection;
use fortuna_types::{
    MessageKey, OutcomeTag, OverlayKind, OverlayMessage, PlayerRoster, SpinValue, VOWEL_PRICE,
};

use crate::common::{Clock, app_for, mount_error, mount_json, mount_once, start_game_server};

fn opening(game_id: &str, scores: serde_json::Value) -> serde_json::Value {
    json!({
        "game_id": game_id,
        "topic": "Animals",
        "masked": "_ _ _",
        "current_player_idx": 0,
        "player_scores": scores,
        "can_guess": false,
    })
}

async fn start_two_player_game(server: &MockServer, clock: &mut Clock) -> App {
    let mut app = app_for(server);
    app.start_game(
        PlayerRoster::new(&["Ada", "Grace"]).expect("roster"),
        clock.now(),
    );
    clock.settle(&mut app, |app| app.game_id().is_some()).await;
    app
}

fn phase(app: &App) -> Option<SpinPhase> {
    app.spin_engine().map(|engine| engine.phase())
}

#[tokio::test]
async fn spin_guess_and_solve() {
    let server = start_game_server().await;
    mount_once(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;
    mount_json(
        &server,
        "/spin",
        json!({ "value": 500, "old_score": 0, "new_score": 0, "can_guess": true }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/guess-letter"))
        .and(body_json(json!({ "game_id": "g1", "letter": "C" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "occurrences": 1,
            "added_score": 500,
            "total_score": 500,
            "masked": "C _ _",
            "used_letters": { "C": true },
            "player_scores": { "Ada": 500, "Grace": 0 },
            "can_guess": false,
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/guess-phrase"))
        .and(body_json(json!({ "game_id": "g1", "guess": "cat" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "total_score": 1500,
            "masked": "C A T",
            "complete": true,
            "player_scores": { "Ada": 1500, "Grace": 0 },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    let slot = app.overlay().expect("opening overlay");
    assert_eq!(slot.message, OverlayMessage::Key(MessageKey::TurnSpin));
    assert_eq!(slot.target_player.as_deref(), Some("Ada"));

    app.request_spin();
    assert_eq!(phase(&app), Some(SpinPhase::AwaitingOutcome));
    clock.settle(&mut app, |app| app.mirror().can_guess).await;
    assert_eq!(phase(&app), Some(SpinPhase::Idle));
    let engine = app.spin_engine().expect("engine");
    assert_eq!(engine.sector_under_pointer().outcome(), OutcomeTag::Numeric(500));
    assert_eq!(app.mirror().last_spin, Some(SpinValue::Known(OutcomeTag::Numeric(500))));

    app.guess_letter('c', clock.now());
    clock
        .settle(&mut app, |app| app.mirror().used_letters.contains('C'))
        .await;
    assert_eq!(app.mirror().masked_phrase, "C _ _");
    assert_eq!(app.mirror().score_of("Ada"), 500);
    let pulse = app.view().score_pulse.as_ref().expect("gain pulse");
    assert_eq!(pulse.direction(), PulseDirection::Gain);
    assert_eq!(pulse.amount(), 500);

    app.open_phrase();
    for c in "cat".chars() {
        app.phrase_input(c);
    }
    app.submit_phrase();
    clock.settle(&mut app, |app| app.mirror().complete).await;

    let slot = app.overlay().expect("victory");
    assert_eq!(slot.kind, OverlayKind::Victory);
    assert_eq!(app.mirror().ranking()[0], ("Ada".to_string(), 1500));
    assert!(!app.spin_enabled());
    assert!(!app.phrase_enabled());

    // The scores came with the answer, so nothing is written back.
    let requests = server.received_requests().await.expect("recorded");
    assert!(
        requests
            .iter()
            .all(|request| !request.url.path().contains("/score/"))
    );
}

#[tokio::test]
async fn wrong_letter_passes_the_turn_after_a_pause() {
    let server = start_game_server().await;
    mount_json(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;
    mount_json(&server, "/spin", json!({ "value": 300, "can_guess": true })).await;
    mount_json(
        &server,
        "/guess-letter",
        json!({
            "occurrences": 0,
            "added_score": 0,
            "total_score": 0,
            "used_letters": { "Z": true },
            "current_player_idx": 1,
            "can_guess": false,
        }),
    )
    .await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    app.request_spin();
    clock.settle(&mut app, |app| app.mirror().can_guess).await;

    app.guess_letter('z', clock.now());
    clock
        .settle(&mut app, |app| app.view().letter_flash.is_some())
        .await;
    assert_eq!(app.view().letter_flash.as_ref().map(|f| f.letter()), Some('Z'));
    assert_eq!(app.mirror().active_player_name(), Some("Ada"));

    clock
        .settle(&mut app, |app| app.mirror().active_player_name() == Some("Grace"))
        .await;
    assert!(app.view().letter_flash.is_none());
    let slot = app.overlay().expect("turn change");
    assert_eq!(slot.message, OverlayMessage::Key(MessageKey::ChangeTurn));
    assert_eq!(slot.target_player.as_deref(), Some("Grace"));
    assert!(app.spin_enabled());
}

#[tokio::test]
async fn failed_spin_shows_the_server_message() {
    let server = start_game_server().await;
    mount_json(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;
    mount_error(&server, "/spin", 500, json!({ "detail": "wheel jammed" })).await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    app.request_spin();
    clock
        .settle(&mut app, |app| {
            app.overlay().is_some_and(|slot| slot.kind == OverlayKind::Error)
        })
        .await;

    let slot = app.overlay().expect("error overlay");
    assert_eq!(slot.message, OverlayMessage::Text("wheel jammed".into()));
    assert!(slot.is_error);
    assert_eq!(phase(&app), Some(SpinPhase::Idle));
    assert!(app.spin_enabled());
}

#[tokio::test]
async fn empty_spin_answer_changes_nothing() {
    let server = start_game_server().await;
    mount_json(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;
    Mock::given(method("POST"))
        .and(path("/spin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    app.dismiss_overlay();
    app.request_spin();
    clock
        .settle(&mut app, |app| phase(app) == Some(SpinPhase::Idle))
        .await;

    assert!(app.overlay().is_none());
    assert!(app.mirror().last_spin.is_none());
    assert!(app.spin_enabled());
}

#[tokio::test]
async fn buying_and_revealing_a_vowel() {
    let server = start_game_server().await;
    mount_json(&server, "/new-game", opening("g1", json!({ "Ada": 600, "Grace": 0 }))).await;
    Mock::given(method("POST"))
        .and(path("/buy-vowel"))
        .and(body_json(json!({ "game_id": "g1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "player_scores": { "Ada": 600 } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/buy-vowel"))
        .and(body_json(json!({ "game_id": "g1", "letter": "A" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "masked": "_ A _",
            "used_letters": { "A": true },
            "player_scores": { "Ada": 100, "Grace": 0 },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    assert!(app.buy_vowel_enabled());

    app.buy_vowel(clock.now());
    clock.settle(&mut app, App::vowel_mode).await;
    assert!(!app.spin_enabled());

    app.guess_letter('a', clock.now());
    clock
        .settle(&mut app, |app| app.mirror().used_letters.contains('A'))
        .await;
    assert!(!app.vowel_mode());
    assert_eq!(app.mirror().masked_phrase, "_ A _");
    assert_eq!(app.mirror().score_of("Ada"), 100);
    let pulse = app.view().score_pulse.as_ref().expect("charge pulse");
    assert_eq!(pulse.direction(), PulseDirection::Loss);
    assert_eq!(pulse.amount(), VOWEL_PRICE);
}

#[tokio::test]
async fn phrase_total_without_scores_is_written_back() {
    let server = start_game_server().await;
    mount_json(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;
    mount_json(
        &server,
        "/guess-phrase",
        json!({ "success": false, "total_score": 0, "current_player_idx": 1 }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/games/g1/score/set"))
        .and(body_json(json!({ "player": "Ada", "value": 0 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "player_scores": { "Ada": 0, "Grace": 0 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    app.open_phrase();
    for c in "dog".chars() {
        app.phrase_input(c);
    }
    app.submit_phrase();
    clock
        .settle(&mut app, |app| {
            app.overlay()
                .is_some_and(|slot| slot.message.key() == Some(MessageKey::WrongAnswerTurn))
        })
        .await;
    assert_eq!(app.overlay().and_then(|s| s.target_player.as_deref()), Some("Grace"));

    // Let the score write-back land.
    clock.settle(&mut app, App::phrase_enabled).await;
    assert_eq!(app.mirror().active_player_name(), Some("Grace"));
}

#[tokio::test]
async fn new_game_with_the_same_players() {
    let server = start_game_server().await;
    mount_once(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;
    mount_once(&server, "/new-game", opening("g2", json!({ "Ada": 0, "Grace": 0 }))).await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    assert_eq!(app.game_id(), Some("g1"));

    app.request_new_game(clock.now());
    assert_eq!(app.overlay().map(|s| s.kind), Some(OverlayKind::Confirm));
    assert!(!app.spin_enabled());

    app.confirm_new_game(NewGameChoice::SamePlayers, clock.now());
    assert!(app.is_starting());
    clock
        .settle(&mut app, |app| app.game_id() == Some("g2"))
        .await;
    assert_eq!(app.screen(), Screen::Game);
    assert_eq!(app.mirror().player_names, ["Ada", "Grace"]);
}

#[tokio::test]
async fn changing_players_returns_to_setup_with_names() {
    let server = start_game_server().await;
    mount_json(&server, "/new-game", opening("g1", json!({ "Ada": 0, "Grace": 0 }))).await;

    let mut clock = Clock::new();
    let mut app = start_two_player_game(&server, &mut clock).await;
    app.request_new_game(clock.now());
    app.confirm_new_game(NewGameChoice::ChangePlayers, clock.now());

    assert_eq!(app.screen(), Screen::Setup);
    assert!(app.game_id().is_none());
    assert!(app.spin_engine().is_none());
    assert_eq!(app.setup().names(), ["Ada", "Grace"]);
}
