//! Status presentation: labels and outcome accents.
//!
//! Pure functions with no state; the presentation layer uses the outcome to
//! pick an accent color and the label as the headline text.

use crate::model::GameStatus;

/// Tri-state outcome classification for a settled round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    Favorable,
    Unfavorable,
    Neutral,
}

/// Human-readable label for a status value.
pub fn label(status: GameStatus) -> &'static str {
    match status {
        GameStatus::PlayerTurn => "Your Turn",
        GameStatus::DealerTurn => "Dealer's Turn",
        GameStatus::PlayerWon => "You Win!",
        GameStatus::DealerWon => "Dealer Wins!",
        GameStatus::Push => "Push (Tie)",
        GameStatus::PlayerBust => "Bust!",
        GameStatus::DealerBust => "Dealer Busts!",
    }
}

/// Outcome accent for a status value. Turn statuses carry no accent.
pub fn outcome(status: GameStatus) -> Option<Outcome> {
    match status {
        GameStatus::PlayerTurn | GameStatus::DealerTurn => None,
        GameStatus::PlayerWon | GameStatus::DealerBust => Some(Outcome::Favorable),
        GameStatus::DealerWon | GameStatus::PlayerBust => Some(Outcome::Unfavorable),
        GameStatus::Push => Some(Outcome::Neutral),
    }
}
