//! Snapshot-to-view reconciliation.
//!
//! The server only ever sends full state snapshots. The [`Reconciler`] keeps
//! its own record of what is currently rendered (the [`ViewState`]) and, for
//! each incoming snapshot, computes the minimal ordered list of render
//! operations that moves the view to match: appends for newly dealt cards,
//! reveals for cards whose identity the server has stopped withholding, and
//! content refreshes as a defensive idempotent backstop.
//!
//! Cards are never removed or reordered incrementally. The one structural
//! change a diff cannot express is a split, which redistributes an
//! already-rendered card into a new hand; that triggers a full rebuild of
//! both player hands (see [`hands`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Card, CardFace, GameStatus, HandSnapshot, Snapshot};

pub mod hands;
pub mod sequencer;

use hands::HandTracker;
use sequencer::DealContext;
pub use sequencer::SequencedOp;

/// Which hand a render operation targets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum HandId {
    Player,
    Dealer,
    Split,
}

/// Rendered state of one card slot.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CardView {
    Masked,
    Revealed(CardFace),
}

impl CardView {
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Masked)
    }

    pub fn face(&self) -> Option<CardFace> {
        match self {
            Self::Masked => None,
            Self::Revealed(face) => Some(*face),
        }
    }
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        match card {
            Card::Masked => Self::Masked,
            Card::Revealed(face) => Self::Revealed(face),
        }
    }
}

/// Rendered state of one hand.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandView {
    pub cards: Vec<CardView>,
}

/// The client's record of what is currently rendered, used as the diff
/// baseline. Owned by the [`Reconciler`] for the life of one game; the
/// presentation layer may read it but never mutates it directly.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ViewState {
    pub player: HandView,
    pub dealer: HandView,
    pub split: Option<HandView>,
    /// Last observed status, used to detect the hole-card transition.
    pub status: GameStatus,
}

impl ViewState {
    fn empty(status: GameStatus) -> Self {
        Self {
            player: HandView::default(),
            dealer: HandView::default(),
            split: None,
            status,
        }
    }

    /// The view of one hand, if it exists.
    pub fn hand(&self, id: HandId) -> Option<&HandView> {
        match id {
            HandId::Player => Some(&self.player),
            HandId::Dealer => Some(&self.dealer),
            HandId::Split => self.split.as_ref(),
        }
    }
}

/// How a reveal should be presented.
///
/// The dealer's hole card becoming visible on the turn-over out of
/// `PlayerTurn` is a first-class event: the presentation layer typically
/// wants a card flip there rather than a generic reveal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RevealKind {
    HoleCard,
    Standard,
}

/// One incremental render operation.
///
/// Operations are emitted in application order and never remove or reorder
/// a card within a hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RenderOp {
    /// A card arrived at the end of a hand.
    Append {
        hand: HandId,
        index: usize,
        card: CardView,
    },
    /// A previously masked card became identified.
    Reveal {
        hand: HandId,
        index: usize,
        face: CardFace,
        kind: RevealKind,
    },
    /// Cached content drifted from the snapshot; re-render in place.
    Refresh {
        hand: HandId,
        index: usize,
        face: CardFace,
    },
    /// The hand that currently accepts actions changed (split play).
    SetActiveHand { index: usize },
}

impl RenderOp {
    fn is_append(&self) -> bool {
        matches!(self, Self::Append { .. })
    }
}

/// Non-fatal contract violations observed while reconciling.
///
/// The server is authoritative, so the reconciler never guesses a recovery:
/// it skips the offending change and reports it.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum Diagnostic {
    /// A snapshot reported a previously revealed card as masked again.
    /// Masking is one-way within a game; the reveal is kept.
    #[error("snapshot re-masked a revealed card ({hand:?} index {index})")]
    RemaskedCard { hand: HandId, index: usize },
    /// A snapshot reported fewer cards than are rendered without a split
    /// rebuild; the rendered cards are kept.
    #[error("snapshot shrank a hand ({hand:?}: {rendered} rendered, {reported} reported)")]
    HandShrunk {
        hand: HandId,
        rendered: usize,
        reported: usize,
    },
}

/// Result of applying one snapshot.
#[derive(Clone, Debug, Default)]
pub struct Reconciliation {
    /// Ordered, timing-annotated render operations.
    pub ops: Vec<SequencedOp>,
    /// Contract violations observed; empty in the normal case.
    pub diagnostics: Vec<Diagnostic>,
}

impl Reconciliation {
    /// Whether the snapshot changed anything worth rendering.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Converts a sequence of full-state snapshots into incremental view
/// updates.
///
/// One reconciler instance serves one client session; a snapshot with an
/// unfamiliar game id starts a fresh [`ViewState`].
#[derive(Debug, Default)]
pub struct Reconciler {
    view: Option<ViewState>,
    tracker: HandTracker,
    game_id: Option<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view state, if a game is in progress.
    pub fn view(&self) -> Option<&ViewState> {
        self.view.as_ref()
    }

    /// Hand bookkeeping for the current game.
    pub fn tracker(&self) -> &HandTracker {
        &self.tracker
    }

    /// Drop all cached state, e.g. when returning to the bet screen.
    pub fn reset(&mut self) {
        self.view = None;
        self.tracker.reset();
        self.game_id = None;
    }

    /// Reconcile the cached view against `next`, mutating the view in place
    /// and returning the ordered render operations that were applied.
    ///
    /// Applying the same snapshot twice yields zero operations the second
    /// time.
    pub fn apply(&mut self, next: &Snapshot) -> Reconciliation {
        let new_game = self.game_id.as_deref() != Some(next.id.as_str());
        if new_game {
            self.game_id = Some(next.id.clone());
            self.tracker.reset();
            self.view = Some(ViewState::empty(next.status));
            return self.rebuild(next, DealContext::InitialDeal);
        }

        if self.tracker.needs_rebuild(next) {
            // A split moved an already-rendered card into a new hand, which
            // an append-only diff cannot express. Discard both player hand
            // views and re-append from the snapshot; the dealer view
            // survives.
            return self.rebuild(next, DealContext::SplitRebuild);
        }

        self.diff(next)
    }

    fn rebuild(&mut self, next: &Snapshot, context: DealContext) -> Reconciliation {
        let view = match self.view.as_mut() {
            Some(view) => view,
            None => return Reconciliation::default(),
        };

        let mut ops = Vec::new();
        let mut diagnostics = Vec::new();

        view.player.cards.clear();
        append_all(HandId::Player, &mut view.player, &next.player_hand, &mut ops);

        match context {
            DealContext::InitialDeal => {
                view.dealer.cards.clear();
                append_all(HandId::Dealer, &mut view.dealer, &next.dealer_hand, &mut ops);
            }
            // The dealer hand is untouched by a split; keep diffing it so a
            // simultaneous dealer change is not lost.
            DealContext::SplitRebuild | DealContext::Incremental => {
                reconcile_hand(
                    HandId::Dealer,
                    &mut view.dealer,
                    &next.dealer_hand,
                    false,
                    &mut ops,
                    &mut diagnostics,
                );
            }
        }

        if let Some(split_hand) = &next.split_hand {
            let split_view = view.split.get_or_insert_with(HandView::default);
            split_view.cards.clear();
            append_all(HandId::Split, split_view, split_hand, &mut ops);
        } else {
            view.split = None;
        }

        view.status = next.status;
        if let Some(index) = self.tracker.observe(next) {
            ops.push(RenderOp::SetActiveHand { index });
        }

        for diagnostic in &diagnostics {
            log::warn!("reconcile diagnostic: {diagnostic}");
        }

        Reconciliation {
            ops: sequencer::sequence(ops, context),
            diagnostics,
        }
    }

    fn diff(&mut self, next: &Snapshot) -> Reconciliation {
        let view = match self.view.as_mut() {
            Some(view) => view,
            None => return Reconciliation::default(),
        };

        let mut ops = Vec::new();
        let mut diagnostics = Vec::new();

        // The hole card is expected to come up in the same snapshot that
        // moves the game out of PlayerTurn.
        let hole_flip = view.status.is_player_turn() && !next.status.is_player_turn();

        reconcile_hand(
            HandId::Player,
            &mut view.player,
            &next.player_hand,
            false,
            &mut ops,
            &mut diagnostics,
        );
        reconcile_hand(
            HandId::Dealer,
            &mut view.dealer,
            &next.dealer_hand,
            hole_flip,
            &mut ops,
            &mut diagnostics,
        );
        if let (Some(split_view), Some(split_hand)) = (view.split.as_mut(), next.split_hand.as_ref())
        {
            reconcile_hand(
                HandId::Split,
                split_view,
                split_hand,
                false,
                &mut ops,
                &mut diagnostics,
            );
        }

        view.status = next.status;
        if let Some(index) = self.tracker.observe(next) {
            ops.push(RenderOp::SetActiveHand { index });
        }

        for diagnostic in &diagnostics {
            log::warn!("reconcile diagnostic: {diagnostic}");
        }

        Reconciliation {
            ops: sequencer::sequence(ops, DealContext::Incremental),
            diagnostics,
        }
    }
}

fn append_all(id: HandId, view: &mut HandView, next: &HandSnapshot, ops: &mut Vec<RenderOp>) {
    for (index, card) in next.cards.iter().enumerate() {
        let card = CardView::from(*card);
        view.cards.push(card);
        ops.push(RenderOp::Append {
            hand: id,
            index,
            card,
        });
    }
}

/// Diff one hand. `hole_flip` marks the snapshot in which the dealer's hole
/// card (index 1) is expected to turn over.
fn reconcile_hand(
    id: HandId,
    view: &mut HandView,
    next: &HandSnapshot,
    hole_flip: bool,
    ops: &mut Vec<RenderOp>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let rendered = view.cards.len();

    if next.cards.len() < rendered {
        diagnostics.push(Diagnostic::HandShrunk {
            hand: id,
            rendered,
            reported: next.cards.len(),
        });
    }

    // 1. Append newly dealt cards, in deal order.
    for (index, card) in next.cards.iter().enumerate().skip(rendered) {
        let card = CardView::from(*card);
        view.cards.push(card);
        ops.push(RenderOp::Append {
            hand: id,
            index,
            card,
        });
    }

    // 2. Reveal and refresh existing cards. Never re-mask.
    for index in 0..rendered.min(next.cards.len()) {
        let reported = next.cards[index];
        match (view.cards[index], reported) {
            (CardView::Masked, Card::Revealed(face)) => {
                let kind = if hole_flip && id == HandId::Dealer && index == 1 {
                    RevealKind::HoleCard
                } else {
                    RevealKind::Standard
                };
                view.cards[index] = CardView::Revealed(face);
                ops.push(RenderOp::Reveal {
                    hand: id,
                    index,
                    face,
                    kind,
                });
            }
            (CardView::Revealed(_), Card::Masked) => {
                diagnostics.push(Diagnostic::RemaskedCard { hand: id, index });
            }
            (CardView::Revealed(rendered_face), Card::Revealed(face)) => {
                if rendered_face != face {
                    view.cards[index] = CardView::Revealed(face);
                    ops.push(RenderOp::Refresh {
                        hand: id,
                        index,
                        face,
                    });
                }
            }
            (CardView::Masked, Card::Masked) => {}
        }
    }
}
