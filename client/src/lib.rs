//! Game-server client for Fortuna.
//!
//! # Architecture
//!
//! The engine never talks HTTP directly. It holds an `Arc<dyn GameServer>`
//! and receives boxed, `'static` futures it can spawn, abort and poll on its
//! own schedule. [`HttpGameServer`] is the production implementation; tests
//! substitute fakes.
//!
//! | Call | Endpoint | Body |
//! |------|----------|------|
//! | [`GameServer::new_game`] | `POST /new-game` | `{num_players, player_names}` |
//! | [`GameServer::spin`] | `POST /spin` | `{game_id}` |
//! | [`GameServer::guess_letter`] | `POST /guess-letter` | `{game_id, letter}` |
//! | [`GameServer::guess_phrase`] | `POST /guess-phrase` | `{game_id, guess}` |
//! | [`GameServer::buy_vowel`] | `POST /buy-vowel` | `{game_id}` |
//! | [`GameServer::reveal_vowel`] | `POST /buy-vowel` | `{game_id, letter}` |
//! | [`GameServer::increment_score`] | `POST /games/{id}/score/increment` | `{player, delta}` |
//! | [`GameServer::set_score`] | `POST /games/{id}/score/set` | `{player, value}` |
//!
//! # Error Handling
//!
//! Every call resolves to `Result<_, ClientError>`. Transport failures are
//! [`ClientError::Network`]; non-2xx answers are [`ClientError::Rejected`]
//! with whatever message the body carried. Game actions are not idempotent,
//! so nothing is retried here.

mod error;

use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

pub use error::ClientError;
pub use fortuna_types;
use fortuna_types::{GuessResponse, NewGameResponse, PhraseGuessResponse, Snapshot, SpinResponse};

use error::extract_error_message;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 4;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Future returned by every [`GameServer`] call.
pub type ServerFuture<T> = BoxFuture<'static, Result<T, ClientError>>;

/// The remote authority. Implementations must not hold borrows across the
/// returned futures.
pub trait GameServer: Send + Sync {
    fn new_game(&self, player_names: &[String]) -> ServerFuture<NewGameResponse>;

    /// `Ok(None)` when the server answers with an empty or `null` body.
    fn spin(&self, game_id: &str) -> ServerFuture<Option<SpinResponse>>;

    fn guess_letter(&self, game_id: &str, letter: char) -> ServerFuture<GuessResponse>;

    fn guess_phrase(&self, game_id: &str, guess: &str) -> ServerFuture<PhraseGuessResponse>;

    /// Charge the active player for a vowel; the letter is chosen afterwards.
    fn buy_vowel(&self, game_id: &str) -> ServerFuture<Snapshot>;

    fn reveal_vowel(&self, game_id: &str, letter: char) -> ServerFuture<Snapshot>;

    fn increment_score(&self, game_id: &str, player: &str, delta: i64) -> ServerFuture<Snapshot>;

    fn set_score(&self, game_id: &str, player: &str, value: i64) -> ServerFuture<Snapshot>;
}

/// Timeouts for the HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(15),
        }
    }
}

fn client_builder(settings: ClientSettings) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("fortuna/", env!("CARGO_PKG_VERSION"))),
    );

    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

/// Parse and normalize a server base URL so endpoint paths append to it.
pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ClientError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::UnsupportedUrl {
            url: raw.to_string(),
        });
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// [`GameServer`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpGameServer {
    client: reqwest::Client,
    base: Url,
}

impl HttpGameServer {
    pub fn new(base_url: &str, settings: ClientSettings) -> Result<Self, ClientError> {
        let base = parse_base_url(base_url)?;
        let client = client_builder(settings)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { client, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Validated in `parse_base_url`: http(s) URLs always have segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn post<T>(&self, segments: &[&str], body: Value) -> ServerFuture<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self.client.post(self.endpoint(segments)).json(&body);
        async move {
            let bytes = send(request).await?;
            serde_json::from_slice(&bytes).map_err(ClientError::InvalidBody)
        }
        .boxed()
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<Vec<u8>, ClientError> {
    let response = request.send().await.map_err(ClientError::Network)?;
    let status = response.status();
    let url_path = response.url().path().to_string();
    let bytes = response.bytes().await.map_err(ClientError::Network)?;
    tracing::debug!(path = %url_path, status = status.as_u16(), "game server responded");
    if !status.is_success() {
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message: extract_error_message(&bytes),
        });
    }
    Ok(bytes.to_vec())
}

/// Empty, `null` and `false` bodies mean "no result".
fn parse_optional<T: DeserializeOwned>(bytes: &[u8]) -> Result<Option<T>, ClientError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(bytes).map_err(ClientError::InvalidBody)?;
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        value => serde_json::from_value(value)
            .map(Some)
            .map_err(ClientError::InvalidBody),
    }
}

impl GameServer for HttpGameServer {
    fn new_game(&self, player_names: &[String]) -> ServerFuture<NewGameResponse> {
        self.post(
            &["new-game"],
            json!({
                "num_players": player_names.len(),
                "player_names": player_names,
            }),
        )
    }

    fn spin(&self, game_id: &str) -> ServerFuture<Option<SpinResponse>> {
        let request = self
            .client
            .post(self.endpoint(&["spin"]))
            .json(&json!({ "game_id": game_id }));
        async move {
            let bytes = send(request).await?;
            parse_optional(&bytes)
        }
        .boxed()
    }

    fn guess_letter(&self, game_id: &str, letter: char) -> ServerFuture<GuessResponse> {
        self.post(
            &["guess-letter"],
            json!({ "game_id": game_id, "letter": letter.to_ascii_uppercase().to_string() }),
        )
    }

    fn guess_phrase(&self, game_id: &str, guess: &str) -> ServerFuture<PhraseGuessResponse> {
        self.post(
            &["guess-phrase"],
            json!({ "game_id": game_id, "guess": guess }),
        )
    }

    fn buy_vowel(&self, game_id: &str) -> ServerFuture<Snapshot> {
        self.post(&["buy-vowel"], json!({ "game_id": game_id }))
    }

    fn reveal_vowel(&self, game_id: &str, letter: char) -> ServerFuture<Snapshot> {
        self.post(
            &["buy-vowel"],
            json!({ "game_id": game_id, "letter": letter.to_ascii_uppercase().to_string() }),
        )
    }

    fn increment_score(
        &self,
        game_id: &str,
        player: &str,
        delta: i64,
    ) -> ServerFuture<Snapshot> {
        self.post(
            &["games", game_id, "score", "increment"],
            json!({ "player": player, "delta": delta }),
        )
    }

    fn set_score(&self, game_id: &str, player: &str, value: i64) -> ServerFuture<Snapshot> {
        self.post(
            &["games", game_id, "score", "set"],
            json!({ "player": player, "value": value }),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{ClientError, ClientSettings, GameServer, HttpGameServer, parse_base_url};
    use fortuna_types::{OutcomeTag, PlayerRef, SpinValue};

    fn server_for(mock: &MockServer) -> HttpGameServer {
        HttpGameServer::new(&mock.uri(), ClientSettings::default()).expect("client")
    }

    #[test]
    fn base_url_validation() {
        assert!(parse_base_url("http://localhost:8000").is_ok());
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(ClientError::UnsupportedUrl { .. })
        ));
    }

    #[test]
    fn endpoints_append_to_base_path() {
        let server = HttpGameServer::new("http://example.test/api/", ClientSettings::default())
            .expect("client");
        assert_eq!(
            server.endpoint(&["spin"]).as_str(),
            "http://example.test/api/spin"
        );
        assert_eq!(
            server.endpoint(&["games", "g/1", "score", "set"]).as_str(),
            "http://example.test/api/games/g%2F1/score/set"
        );
    }

    #[tokio::test]
    async fn new_game_posts_roster() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/new-game"))
            .and(body_json(json!({ "num_players": 2, "player_names": ["Ada", "Grace"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "game_id": "g1",
                "topic": "Proverbs",
                "masked": "_ _ _",
                "current_player_idx": 1
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let response = server_for(&mock)
            .new_game(&["Ada".to_string(), "Grace".to_string()])
            .await
            .expect("new game");
        assert_eq!(response.game_id, "g1");
        assert_eq!(response.snapshot.topic.as_deref(), Some("Proverbs"));
        assert_eq!(response.snapshot.current_player_idx, Some(1));
    }

    #[tokio::test]
    async fn spin_parses_special_outcomes() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/spin"))
            .and(body_json(json!({ "game_id": "g1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": "Passa",
                "old_score": 0,
                "new_score": 0,
                "current_player_idx": 0
            })))
            .mount(&mock)
            .await;

        let response = server_for(&mock)
            .spin("g1")
            .await
            .expect("spin")
            .expect("payload");
        assert_eq!(response.value, SpinValue::Known(OutcomeTag::Pass));
    }

    #[tokio::test]
    async fn spin_with_null_body_is_none() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/spin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&mock)
            .await;

        assert!(server_for(&mock).spin("g1").await.expect("spin").is_none());
    }

    #[tokio::test]
    async fn rejection_carries_server_message() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/buy-vowel"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "detail": "Not enough points" })),
            )
            .mount(&mock)
            .await;

        let err = server_for(&mock)
            .buy_vowel("g1")
            .await
            .expect_err("rejected");
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.server_message(), Some("Not enough points"));
    }

    #[tokio::test]
    async fn guess_letter_sends_uppercase() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/guess-letter"))
            .and(body_json(json!({ "game_id": "g1", "letter": "R" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "occurrences": 2,
                "added_score": 600,
                "total_score": 600,
                "masked": "R _ R",
                "complete": false,
                "swapped_player": "Grace"
            })))
            .expect(1)
            .mount(&mock)
            .await;

        let response = server_for(&mock)
            .guess_letter("g1", 'r')
            .await
            .expect("guess");
        assert_eq!(response.added_score, 600);
        assert_eq!(
            response.snapshot.swapped_player,
            Some(PlayerRef::Name("Grace".into()))
        );
    }

    #[tokio::test]
    async fn score_endpoints_use_game_path() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/games/g1/score/increment"))
            .and(body_json(json!({ "player": "Ada", "delta": 250 })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "player_scores": { "Ada": 750 } })),
            )
            .mount(&mock)
            .await;
        Mock::given(method("POST"))
            .and(path("/games/g1/score/set"))
            .and(body_json(json!({ "player": "Ada", "value": 0 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "player_scores": { "Ada": 0 } })),
            )
            .mount(&mock)
            .await;

        let server = server_for(&mock);
        let bumped = server
            .increment_score("g1", "Ada", 250)
            .await
            .expect("increment");
        assert_eq!(
            bumped.player_scores.and_then(|s| s.get("Ada").copied()),
            Some(750)
        );
        let reset = server.set_score("g1", "Ada", 0).await.expect("set");
        assert_eq!(
            reset.player_scores.and_then(|s| s.get("Ada").copied()),
            Some(0)
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        // Port 9 (discard) is not expected to accept connections.
        let server = HttpGameServer::new("http://127.0.0.1:9", ClientSettings::default())
            .expect("client");
        let err = server.spin("g1").await.expect_err("network failure");
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn malformed_success_body_is_invalid() {
        let mock = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/guess-phrase"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock)
            .await;

        let err = server_for(&mock)
            .guess_phrase("g1", "anything")
            .await
            .expect_err("invalid body");
        assert!(matches!(err, ClientError::InvalidBody(_)));
    }
}
