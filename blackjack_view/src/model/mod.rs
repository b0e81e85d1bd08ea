//! Typed representation of server-reported game state.
//!
//! Everything in this module is wire-compatible with the JSON the game
//! server emits; the one deliberate divergence is [`Card`], which replaces
//! the server's empty-string masking sentinel with an explicit
//! `Masked | Revealed` variant.

pub mod entities;

pub use entities::{
    Card, CardFace, GameStatus, HandScore, HandSnapshot, Player, Rank, Snapshot, Suit,
};
