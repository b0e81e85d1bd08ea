//! Animation sequencing for render operations.
//!
//! Purely cosmetic timing metadata: operations keep their logical order and
//! only gain a `(sequence, delay)` annotation so that concurrently-arriving
//! cards animate as a stagger instead of popping in at once.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{HandId, RenderOp, RevealKind};

/// Stagger increment for the initial deal and split rebuilds.
pub const INITIAL_DEAL_STAGGER: Duration = Duration::from_millis(100);
/// Stagger increment for the dealer's automatic draw-out. Slower than the
/// initial deal so it reads as the dealer dealing out.
pub const DEALER_DRAW_STAGGER: Duration = Duration::from_millis(250);

/// What kind of snapshot produced the operations being sequenced.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DealContext {
    /// First snapshot of a game; every card is new.
    InitialDeal,
    /// Both player hands rebuilt after a split.
    SplitRebuild,
    /// Ordinary diff against the previous snapshot.
    Incremental,
}

/// A render operation with its presentation timing.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SequencedOp {
    pub op: RenderOp,
    /// Position in the logical operation order.
    pub sequence: usize,
    /// How long the presentation layer should wait before starting this
    /// operation's transition.
    pub delay: Duration,
}

/// Annotate `ops` with timing. Never reorders.
pub(crate) fn sequence(ops: Vec<RenderOp>, context: DealContext) -> Vec<SequencedOp> {
    let delays: Vec<Duration> = match context {
        // All appends across both hands stagger as one dealing sequence.
        DealContext::InitialDeal | DealContext::SplitRebuild => {
            let mut step = 0u32;
            ops.iter()
                .map(|op| match op {
                    RenderOp::Append { .. } => {
                        let delay = INITIAL_DEAL_STAGGER * step;
                        step += 1;
                        delay
                    }
                    _ => Duration::ZERO,
                })
                .collect()
        }
        DealContext::Incremental => incremental_delays(&ops),
    };

    ops.into_iter()
        .zip(delays)
        .enumerate()
        .map(|(sequence, (op, delay))| SequencedOp {
            op,
            sequence,
            delay,
        })
        .collect()
}

/// Incremental policy: a lone append lands immediately; a hand that gains
/// several cards at once (the dealer drawing out) staggers per card. The
/// hole-card flip and other reveals are always immediate.
fn incremental_delays(ops: &[RenderOp]) -> Vec<Duration> {
    let appends_per_hand = |hand: HandId| {
        ops.iter()
            .filter(|op| matches!(op, RenderOp::Append { hand: h, .. } if *h == hand))
            .count()
    };
    let draw_out = [HandId::Player, HandId::Dealer, HandId::Split]
        .into_iter()
        .filter(|hand| appends_per_hand(*hand) > 1)
        .collect::<Vec<_>>();

    let mut steps = [0u32; 3];
    ops.iter()
        .map(|op| match op {
            RenderOp::Append { hand, .. } if draw_out.contains(hand) => {
                let slot = match hand {
                    HandId::Player => 0,
                    HandId::Dealer => 1,
                    HandId::Split => 2,
                };
                let delay = DEALER_DRAW_STAGGER * steps[slot];
                steps[slot] += 1;
                delay
            }
            _ => Duration::ZERO,
        })
        .collect()
}
