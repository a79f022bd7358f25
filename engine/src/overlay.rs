//! Single-slot transient notifications.

use std::time::Instant;

use fortuna_types::{MessageKey, OverlayKind, OverlaySlot};

/// Holds at most one [`OverlaySlot`].
///
/// `show` always wins: a new slot replaces the current one and restarts its
/// dwell. TurnChange and Error slots expire on their own; Victory and
/// Confirm stay until dismissed.
#[derive(Debug, Default)]
pub struct OverlayCoordinator {
    slot: Option<OverlaySlot>,
}

impl OverlayCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<&OverlaySlot> {
        self.slot.as_ref()
    }

    #[must_use]
    pub fn is_showing(&self, kind: OverlayKind) -> bool {
        self.slot.as_ref().is_some_and(|slot| slot.kind == kind)
    }

    pub fn show(&mut self, mut slot: OverlaySlot, now: Instant) {
        slot.expires_at = slot.kind.dwell().map(|dwell| now + dwell);
        if let Some(previous) = &self.slot {
            tracing::debug!(from = ?previous.kind, to = ?slot.kind, "overlay replaced");
        }
        self.slot = Some(slot);
    }

    /// Hide an expired slot. Returns `true` if one was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        let expired = self
            .slot
            .as_ref()
            .and_then(|slot| slot.expires_at)
            .is_some_and(|at| now >= at);
        if expired {
            self.slot = None;
        }
        expired
    }

    pub fn dismiss(&mut self) -> Option<OverlaySlot> {
        self.slot.take()
    }

    /// Hide the current slot if it is one of `kinds`.
    pub fn dismiss_kinds(&mut self, kinds: &[OverlayKind]) {
        if self.slot.as_ref().is_some_and(|slot| kinds.contains(&slot.kind)) {
            self.slot = None;
        }
    }

    /// Raise the turn notification a merge asked for. Returns `true` if a
    /// slot was shown.
    ///
    /// A swap outranks a plain turn change from the same update.
    pub fn apply_turn_signals(
        &mut self,
        swapped_player: Option<String>,
        new_active: Option<&str>,
        turn_changed: bool,
        now: Instant,
    ) -> bool {
        if let Some(name) = swapped_player {
            self.show(OverlaySlot::turn_change(MessageKey::SwapPlayers, Some(name)), now);
            true
        } else if turn_changed {
            self.show(
                OverlaySlot::turn_change(MessageKey::ChangeTurn, new_active.map(str::to_owned)),
                now,
            );
            true
        } else {
            false
        }
    }

    /// Point a showing generic turn change at the new active player. Any
    /// other slot keeps its target.
    pub fn sync_active_player(&mut self, active: Option<&str>) {
        if let Some(slot) = self.slot.as_mut()
            && slot.is_generic_turn_change()
        {
            slot.target_player = active.map(str::to_owned);
        }
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}
