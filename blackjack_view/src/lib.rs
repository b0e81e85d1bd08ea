//! # Blackjack View
//!
//! The presentation reconciliation core for a blackjack client whose rules,
//! dealing, and scoring live entirely on a remote authoritative server.
//!
//! The server only ever sends full state snapshots. This library converts a
//! sequence of those snapshots into incremental, animation-correct view
//! updates without losing, duplicating, or re-ordering a card:
//!
//! - [`model`]: typed representation of one server-reported game state,
//!   including the one-way masked/revealed card distinction.
//! - [`reconcile`]: the [`Reconciler`](reconcile::Reconciler), which diffs a
//!   new [`Snapshot`](model::Snapshot) against its cached
//!   [`ViewState`](reconcile::ViewState) and emits an ordered list of render
//!   operations annotated with stagger timing.
//! - [`status`]: pure presentation mapping from game status to a label and an
//!   outcome accent.
//!
//! The library performs no I/O and knows nothing about any rendering
//! technology; a presentation layer applies the emitted operations to real
//! view elements.
//!
//! ## Example
//!
//! ```
//! use blackjack_view::reconcile::Reconciler;
//!
//! // A fresh reconciler holds no view state until the first snapshot.
//! let reconciler = Reconciler::new();
//! assert!(reconciler.view().is_none());
//! ```

/// Wire-compatible game state types.
pub mod model;
pub use model::{Card, CardFace, GameStatus, HandScore, HandSnapshot, Player, Rank, Snapshot, Suit};

/// Snapshot-to-view reconciliation, hand tracking, and animation sequencing.
pub mod reconcile;
pub use reconcile::{
    CardView, Diagnostic, HandId, HandView, Reconciler, Reconciliation, RenderOp, RevealKind,
    SequencedOp, ViewState,
    hands::{self, HandTracker},
    sequencer::{DEALER_DRAW_STAGGER, INITIAL_DEAL_STAGGER},
};

/// Status labels and outcome accents.
pub mod status;
pub use status::Outcome;
