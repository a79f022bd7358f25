use serde::Deserialize;
use std::{env, fs, io, path::PathBuf, time::Duration};
use thiserror::Error;

use fortuna_client::{ClientSettings, DEFAULT_SERVER_URL};
use fortuna_types::ui::UiOptions;

/// Overrides `[server] url`.
pub const SERVER_URL_ENV: &str = "FORTUNA_SERVER_URL";
/// Overrides `[game] players`; comma-separated names.
pub const PLAYERS_ENV: &str = "FORTUNA_PLAYERS";

// Default value function for serde (bool::default() is false, so only true needs a fn)
pub(crate) const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct FortunaConfig {
    pub server: Option<ServerConfig>,
    pub game: Option<GameConfig>,
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the game server. `${VAR}` references are expanded.
    pub url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct GameConfig {
    /// Names prefilled on the setup screen.
    #[serde(default)]
    pub players: Vec<String>,
    /// Let the wheel coast after a failed spin request.
    #[serde(default = "default_true")]
    pub degraded_spin_feedback: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            degraded_spin_feedback: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UiConfig {
    /// Use ASCII-only glyphs.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    /// Disable overlay animations and motion effects.
    #[serde(default)]
    pub reduced_motion: bool,
}

/// Expand `${VAR}` references through `lookup`. Unknown variables expand
/// to nothing; an unclosed `${` is kept as written.
pub fn expand_env_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(open) = rest.find("${") {
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let var = &after[..close];
        if var.is_empty() {
            out.push_str("${}");
        } else if let Some(replacement) = lookup(var) {
            out.push_str(&replacement);
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

impl FortunaConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(path),
            None => Ok(None),
        }
    }

    /// Load a specific file. A missing file is `Ok(None)`.
    pub fn load_from(path: PathBuf) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fortuna").join("config.toml"))
}

/// Effective settings after layering config file and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub server_url: String,
    pub client: ClientSettings,
    /// Names prefilled on the setup screen; may be empty.
    pub players: Vec<String>,
    pub degraded_spin_feedback: bool,
    pub ui: UiOptions,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self::resolve_with_env(None, |_| None)
    }
}

impl AppSettings {
    #[must_use]
    pub fn resolve(config: Option<&FortunaConfig>) -> Self {
        Self::resolve_with_env(config, |name| env::var(name).ok())
    }

    pub fn resolve_with_env(
        config: Option<&FortunaConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let server = config.and_then(|c| c.server.as_ref());
        let game = config.and_then(|c| c.game.as_ref());
        let ui = config.and_then(|c| c.ui.as_ref());

        let server_url = lookup(SERVER_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                server
                    .and_then(|s| s.url.as_deref())
                    .map(|url| expand_env_vars(url, &lookup))
            })
            .map_or_else(|| DEFAULT_SERVER_URL.to_string(), |url| url.trim().to_string());

        let defaults = ClientSettings::default();
        let client = ClientSettings {
            connect_timeout: server
                .and_then(|s| s.connect_timeout_secs)
                .map_or(defaults.connect_timeout, Duration::from_secs),
            request_timeout: server
                .and_then(|s| s.request_timeout_secs)
                .map_or(defaults.request_timeout, Duration::from_secs),
        };

        let players = match lookup(PLAYERS_ENV) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
            None => game.map(|g| g.players.clone()).unwrap_or_default(),
        };

        Self {
            server_url,
            client,
            players,
            degraded_spin_feedback: game.is_none_or(|g| g.degraded_spin_feedback),
            ui: UiOptions {
                ascii_only: ui.is_some_and(|u| u.ascii_only),
                high_contrast: ui.is_some_and(|u| u.high_contrast),
                reduced_motion: ui.is_some_and(|u| u.reduced_motion),
            },
        }
    }
}
