//! Local mirror of server-authoritative game state.

use std::collections::BTreeMap;

use crate::outcome::SpinValue;
use crate::snapshot::{PlayerRef, UsedLetters};

/// Everything the client knows about the current game.
///
/// Only the state reconciler writes this; every field is a copy of what the
/// server last said about it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStateMirror {
    pub topic: String,
    pub masked_phrase: String,
    pub used_letters: UsedLetters,
    pub player_scores: BTreeMap<String, i64>,
    pub active_player: Option<usize>,
    pub complete: bool,
    pub can_guess: bool,
    pub last_spin: Option<SpinValue>,
    pub player_names: Vec<String>,
}

impl GameStateMirror {
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    #[must_use]
    pub fn is_multiplayer(&self) -> bool {
        self.player_count() > 1
    }

    #[must_use]
    pub fn active_player_name(&self) -> Option<&str> {
        self.active_player
            .and_then(|idx| self.player_names.get(idx))
            .map(String::as_str)
    }

    #[must_use]
    pub fn score_of(&self, name: &str) -> i64 {
        self.player_scores.get(name).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn active_score(&self) -> i64 {
        self.active_player_name()
            .map(|name| self.score_of(name))
            .unwrap_or(0)
    }

    /// Resolve a server player reference to a display name.
    #[must_use]
    pub fn player_name(&self, player: &PlayerRef) -> Option<String> {
        match player {
            PlayerRef::Name(name) => Some(name.clone()),
            PlayerRef::Index(idx) => self.player_names.get(*idx).cloned(),
        }
    }

    /// Players ordered by score, highest first. Ties keep roster order.
    #[must_use]
    pub fn ranking(&self) -> Vec<(String, i64)> {
        let mut ranking: Vec<(String, i64)> = self
            .player_names
            .iter()
            .map(|name| (name.clone(), self.score_of(name)))
            .collect();
        for (name, score) in &self.player_scores {
            if !self.player_names.contains(name) {
                ranking.push((name.clone(), *score));
            }
        }
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::GameStateMirror;
    use crate::snapshot::PlayerRef;

    fn mirror() -> GameStateMirror {
        GameStateMirror {
            player_names: vec!["Ada".into(), "Grace".into(), "Linus".into()],
            player_scores: [("Ada".into(), 300), ("Grace".into(), 900), ("Linus".into(), 300)]
                .into_iter()
                .collect(),
            active_player: Some(1),
            ..GameStateMirror::default()
        }
    }

    #[test]
    fn ranking_sorts_descending_and_keeps_ties_stable() {
        let ranking = mirror().ranking();
        let names: Vec<&str> = ranking.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Grace", "Ada", "Linus"]);
    }

    #[test]
    fn active_player_helpers() {
        let m = mirror();
        assert_eq!(m.active_player_name(), Some("Grace"));
        assert_eq!(m.active_score(), 900);
        assert!(m.is_multiplayer());
        assert_eq!(m.player_name(&PlayerRef::Index(2)), Some("Linus".into()));
        assert_eq!(m.player_name(&PlayerRef::Index(9)), None);
    }
}
