//! Player setup validation.

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub const MAX_PLAYERS: usize = 4;
pub const MAX_NAME_LEN: usize = 20;
/// Name used when a single player does not enter one.
pub const SOLO_DEFAULT_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("between 1 and {MAX_PLAYERS} players are required, got {0}")]
    PlayerCount(usize),
    #[error("player {position} needs a name")]
    EmptyName { position: usize },
    #[error("player name {name:?} is used twice")]
    DuplicateName { name: String },
    #[error("player name {name:?} is longer than {MAX_NAME_LEN} characters")]
    NameTooLong { name: String },
}

/// Validated, ordered list of player names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRoster {
    names: Vec<String>,
}

impl PlayerRoster {
    pub fn new<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();
        if names.is_empty() || names.len() > MAX_PLAYERS {
            return Err(RosterError::PlayerCount(names.len()));
        }

        if let [only] = names.as_slice() {
            let name = if only.is_empty() {
                SOLO_DEFAULT_NAME.to_string()
            } else {
                only.clone()
            };
            check_length(&name)?;
            return Ok(Self { names: vec![name] });
        }

        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(RosterError::EmptyName { position: i + 1 });
            }
            check_length(name)?;
            let lowered = name.to_lowercase();
            if names[..i].iter().any(|prev| prev.to_lowercase() == lowered) {
                return Err(RosterError::DuplicateName { name: name.clone() });
            }
        }
        Ok(Self { names })
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn is_solo(&self) -> bool {
        self.names.len() == 1
    }
}

fn check_length(name: &str) -> Result<(), RosterError> {
    if name.graphemes(true).count() > MAX_NAME_LEN {
        return Err(RosterError::NameTooLong {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PlayerRoster, RosterError, SOLO_DEFAULT_NAME};

    #[test]
    fn solo_player_gets_default_name() {
        let roster = PlayerRoster::new([" "]).expect("solo roster");
        assert_eq!(roster.names(), [SOLO_DEFAULT_NAME]);
        assert!(roster.is_solo());
    }

    #[test]
    fn names_are_trimmed() {
        let roster = PlayerRoster::new(["  Ada ", "Grace"]).expect("roster");
        assert_eq!(roster.names(), ["Ada", "Grace"]);
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        assert_eq!(
            PlayerRoster::new(["Ada", "ada "]),
            Err(RosterError::DuplicateName { name: "ada".into() })
        );
    }

    #[test]
    fn multiplayer_names_must_be_present() {
        assert_eq!(
            PlayerRoster::new(["Ada", ""]),
            Err(RosterError::EmptyName { position: 2 })
        );
    }

    #[test]
    fn player_count_is_bounded() {
        assert_eq!(
            PlayerRoster::new(Vec::<String>::new()),
            Err(RosterError::PlayerCount(0))
        );
        assert_eq!(
            PlayerRoster::new(["a", "b", "c", "d", "e"]),
            Err(RosterError::PlayerCount(5))
        );
    }

    #[test]
    fn long_names_are_rejected() {
        let long = "x".repeat(21);
        assert!(matches!(
            PlayerRoster::new([long.as_str()]),
            Err(RosterError::NameTooLong { .. })
        ));
    }
}
