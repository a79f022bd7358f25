//! Folding server snapshots into the local game mirror.
//!
//! The mirror is never computed from local actions. Every field a snapshot
//! carries replaces the mirrored field in full; fields it omits stay as they
//! were.

use std::collections::BTreeMap;

use fortuna_types::{GameStateMirror, PlayerRef, Snapshot, UsedLetters, sanitize_terminal_text};

fn clean(text: &str) -> String {
    sanitize_terminal_text(text).into_owned()
}

/// Merge `snapshot` into `current`, returning the new mirror.
#[must_use]
pub fn merge(current: &GameStateMirror, snapshot: &Snapshot) -> GameStateMirror {
    let mut next = current.clone();
    if let Some(topic) = &snapshot.topic {
        next.topic = clean(topic);
    }
    if let Some(masked) = &snapshot.masked {
        next.masked_phrase = clean(masked);
    }
    if let Some(letters) = &snapshot.used_letters {
        next.used_letters = letters.clone();
    }
    if let Some(scores) = &snapshot.player_scores {
        next.player_scores = scores.iter().map(|(name, score)| (clean(name), *score)).collect();
    }
    if let Some(index) = snapshot.current_player_idx {
        next.active_player = Some(index);
    }
    if let Some(complete) = snapshot.complete {
        next.complete = complete;
    }
    if let Some(can_guess) = snapshot.can_guess {
        next.can_guess = can_guess;
    }
    if let Some(last_spin) = &snapshot.last_spin {
        next.last_spin = Some(last_spin.clone());
    }
    if let Some(names) = &snapshot.player_names {
        next.player_names = names.iter().map(|name| clean(name)).collect();
    }
    next
}

/// Signals a merge raised for the overlay layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// The active player moved to this index.
    pub turn_changed: Option<usize>,
    /// The server swapped players; name of the player now holding the turn.
    pub swapped_player: Option<String>,
    /// The game went from running to complete.
    pub completed: bool,
}

impl MergeReport {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }
}

/// Sole owner and writer of the [`GameStateMirror`].
#[derive(Debug, Default)]
pub struct StateReconciler {
    mirror: GameStateMirror,
}

impl StateReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mirror(&self) -> &GameStateMirror {
        &self.mirror
    }

    /// Merge a snapshot and report what changed.
    pub fn apply(&mut self, snapshot: &Snapshot) -> MergeReport {
        let next = merge(&self.mirror, snapshot);
        let report = MergeReport {
            turn_changed: next
                .active_player
                .filter(|_| next.active_player != self.mirror.active_player),
            swapped_player: snapshot
                .swapped_player
                .as_ref()
                .and_then(|player| swapped_name(&next, player)),
            completed: next.complete && !self.mirror.complete,
        };
        if !report.is_quiet() {
            tracing::debug!(?report, "snapshot merged");
        }
        self.mirror = next;
        report
    }

    /// Replace the mirror for a fresh game.
    ///
    /// Scores default to zero for every roster name, the active player to
    /// `fallback_active` and used letters to none, unless the server says
    /// otherwise. A new game never starts with a pending outcome.
    pub fn begin(&mut self, roster: &[String], snapshot: &Snapshot, fallback_active: usize) {
        let base = GameStateMirror {
            player_scores: roster
                .iter()
                .map(|name| (name.clone(), 0))
                .collect::<BTreeMap<_, _>>(),
            player_names: roster.to_vec(),
            active_player: Some(fallback_active),
            used_letters: UsedLetters::default(),
            ..GameStateMirror::default()
        };
        self.mirror = merge(&base, snapshot);
        self.mirror.can_guess = false;
    }

    pub fn reset(&mut self) {
        self.mirror = GameStateMirror::default();
    }
}

fn swapped_name(mirror: &GameStateMirror, player: &PlayerRef) -> Option<String> {
    match player {
        PlayerRef::Name(name) => {
            let name = clean(name.trim());
            (!name.is_empty()).then_some(name)
        }
        PlayerRef::Index(_) => mirror.player_name(player),
    }
}
