//! Multi-hand bookkeeping for split play.
//!
//! A player holds at most two hands: the primary hand and, after a
//! successful split, the split hand. The tracker records which hand
//! currently accepts actions and decides when an incremental diff is no
//! longer sound: a split redistributes an already-rendered card into the
//! new hand, so the first snapshot that carries a `split_hand` forces a
//! full rebuild of both player hand views.

use crate::model::Snapshot;

/// Index of the primary hand.
pub const PRIMARY_HAND: usize = 0;
/// Index of the split hand.
pub const SPLIT_HAND: usize = 1;

/// Tracks split state and the active hand across snapshots of one game.
#[derive(Clone, Debug, Default)]
pub struct HandTracker {
    has_split: bool,
    active_hand: usize,
}

impl HandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a split has occurred this game.
    pub fn has_split(&self) -> bool {
        self.has_split
    }

    /// Which hand currently accepts actions (0 = primary, 1 = split).
    pub fn active_hand(&self) -> usize {
        self.active_hand
    }

    /// Forget everything; called when a new game starts.
    pub fn reset(&mut self) {
        self.has_split = false;
        self.active_hand = PRIMARY_HAND;
    }

    /// Whether `next` carries a structural change the diff cannot express.
    pub(crate) fn needs_rebuild(&self, next: &Snapshot) -> bool {
        !self.has_split && next.split_hand.is_some()
    }

    /// Record the snapshot's hand structure. Returns the new active hand
    /// index when the "active" presentation hint should move, which only
    /// happens while split hands exist and the player may still act.
    pub(crate) fn observe(&mut self, next: &Snapshot) -> Option<usize> {
        let splitting = !self.has_split && next.split_hand.is_some();
        self.has_split = self.has_split || next.split_hand.is_some();
        if !self.has_split || !next.status.is_player_turn() {
            return None;
        }

        let index = next.current_hand_index.unwrap_or(PRIMARY_HAND);
        if splitting || index != self.active_hand {
            self.active_hand = index;
            Some(index)
        } else {
            None
        }
    }
}

/// Best-effort split affordance: status is `PlayerTurn`, no split yet, the
/// primary hand is exactly two revealed cards of equal rank, and the balance
/// covers a second bet. The server remains the authority; this only decides
/// whether to offer the action at all.
pub fn split_eligible(snapshot: &Snapshot) -> bool {
    if !snapshot.status.is_player_turn() || snapshot.split_hand.is_some() {
        return false;
    }
    let cards = &snapshot.player_hand.cards;
    let ranks_match = match (cards.first(), cards.get(1)) {
        (Some(first), Some(second)) if cards.len() == 2 => match (first.face(), second.face()) {
            (Some(a), Some(b)) => a.rank == b.rank,
            _ => false,
        },
        _ => false,
    };
    let funded = match (snapshot.player_balance, snapshot.current_bet) {
        (Some(balance), Some(bet)) => balance >= bet,
        _ => false,
    };
    ranks_match && funded
}
