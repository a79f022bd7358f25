//! Wire shapes of game-server responses.
//!
//! Every action returns some subset of the game state. [`Snapshot`] holds
//! that subset with every field optional; the per-action response types
//! flatten it next to their own fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::outcome::SpinValue;

/// Letters the server has marked as played, normalized to uppercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedLetters(BTreeMap<char, bool>);

impl UsedLetters {
    #[must_use]
    pub fn contains(&self, letter: char) -> bool {
        self.0
            .get(&letter.to_ascii_uppercase())
            .copied()
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0
            .iter()
            .filter(|(_, used)| **used)
            .map(|(letter, _)| *letter)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl FromIterator<char> for UsedLetters {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|c| (c.to_ascii_uppercase(), true))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for UsedLetters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let letters = raw
            .into_iter()
            .filter_map(|(key, used)| {
                let mut chars = key.trim().chars();
                let first = chars.next()?;
                chars.next().is_none().then(|| (first.to_ascii_uppercase(), used))
            })
            .collect();
        Ok(Self(letters))
    }
}

/// A player named by the server either by name or by roster position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PlayerRef {
    Index(usize),
    Name(String),
}

/// Partial game state carried by any server response.
///
/// An absent field means the server said nothing about it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub masked: Option<String>,
    #[serde(default)]
    pub used_letters: Option<UsedLetters>,
    #[serde(default)]
    pub player_scores: Option<BTreeMap<String, i64>>,
    #[serde(default)]
    pub current_player_idx: Option<usize>,
    #[serde(default)]
    pub complete: Option<bool>,
    #[serde(default)]
    pub can_guess: Option<bool>,
    #[serde(default)]
    pub swapped_player: Option<PlayerRef>,
    #[serde(default)]
    pub last_spin: Option<SpinValue>,
    #[serde(default)]
    pub player_names: Option<Vec<String>>,
}

impl Snapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewGameResponse {
    pub game_id: String,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpinResponse {
    pub value: SpinValue,
    #[serde(default)]
    pub old_score: Option<i64>,
    #[serde(default)]
    pub new_score: Option<i64>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuessResponse {
    #[serde(default)]
    pub occurrences: u32,
    #[serde(default)]
    pub added_score: i64,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PhraseGuessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(flatten)]
    pub snapshot: Snapshot,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PlayerRef, Snapshot, SpinResponse, UsedLetters};
    use crate::outcome::{OutcomeTag, SpinValue};

    #[test]
    fn missing_fields_stay_none() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({ "masked": "_ _ A" })).expect("snapshot");
        assert_eq!(snapshot.masked.as_deref(), Some("_ _ A"));
        assert!(snapshot.player_scores.is_none());
        assert!(snapshot.current_player_idx.is_none());
        assert!(!snapshot.is_empty());
        assert!(Snapshot::default().is_empty());
    }

    #[test]
    fn used_letters_are_uppercased_and_filtered() {
        let letters: UsedLetters =
            serde_json::from_value(json!({ "a": true, "B": false, "xy": true, "C": true }))
                .expect("letters");
        assert!(letters.contains('A'));
        assert!(letters.contains('a'));
        assert!(!letters.contains('B'));
        assert!(letters.contains('c'));
        assert_eq!(letters.iter().collect::<Vec<_>>(), vec!['A', 'C']);
    }

    #[test]
    fn swapped_player_accepts_name_or_index() {
        let by_name: Snapshot =
            serde_json::from_value(json!({ "swapped_player": "Ada" })).expect("name");
        assert_eq!(by_name.swapped_player, Some(PlayerRef::Name("Ada".into())));
        let by_index: Snapshot =
            serde_json::from_value(json!({ "swapped_player": 2 })).expect("index");
        assert_eq!(by_index.swapped_player, Some(PlayerRef::Index(2)));
    }

    #[test]
    fn spin_response_flattens_snapshot() {
        let response: SpinResponse = serde_json::from_value(json!({
            "value": "Bancarotta",
            "old_score": 900,
            "new_score": 0,
            "player_scores": { "Ada": 0, "Grace": 300 },
            "current_player_idx": 1
        }))
        .expect("spin response");
        assert_eq!(response.value, SpinValue::Known(OutcomeTag::Bankrupt));
        assert_eq!(response.old_score, Some(900));
        assert_eq!(response.snapshot.current_player_idx, Some(1));
        assert_eq!(
            response
                .snapshot
                .player_scores
                .as_ref()
                .and_then(|s| s.get("Grace")),
            Some(&300)
        );
    }
}
