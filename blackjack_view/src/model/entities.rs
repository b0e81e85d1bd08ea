use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// Suit of a revealed card. Serialized exactly as the server spells it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "Hearts" => Some(Self::Hearts),
            "Diamonds" => Some(Self::Diamonds),
            "Clubs" => Some(Self::Clubs),
            "Spades" => Some(Self::Spades),
            _ => None,
        }
    }

    fn wire_str(self) -> &'static str {
        match self {
            Self::Hearts => "Hearts",
            Self::Diamonds => "Diamonds",
            Self::Clubs => "Clubs",
            Self::Spades => "Spades",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Hearts => "♥",
            Self::Diamonds => "♦",
            Self::Clubs => "♣",
            Self::Spades => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Rank of a revealed card.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    fn from_wire(s: &str) -> Option<Self> {
        match s {
            "2" => Some(Self::Two),
            "3" => Some(Self::Three),
            "4" => Some(Self::Four),
            "5" => Some(Self::Five),
            "6" => Some(Self::Six),
            "7" => Some(Self::Seven),
            "8" => Some(Self::Eight),
            "9" => Some(Self::Nine),
            "10" => Some(Self::Ten),
            "J" => Some(Self::Jack),
            "Q" => Some(Self::Queen),
            "K" => Some(Self::King),
            "A" => Some(Self::Ace),
            _ => None,
        }
    }

    fn wire_str(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.wire_str())
    }
}

/// A fully identified card face.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = format!("{}{}", self.rank, self.suit);
        write!(f, "{repr:>3}")
    }
}

/// One card as reported by the server.
///
/// The server withholds card identity by sending an empty rank; masking is
/// one-way within a game, so a card only ever goes `Masked` to `Revealed`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Card {
    Masked,
    Revealed(CardFace),
}

impl Card {
    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Masked)
    }

    /// The card face, if revealed.
    pub fn face(&self) -> Option<CardFace> {
        match self {
            Self::Masked => None,
            Self::Revealed(face) => Some(*face),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Masked => write!(f, "{:>3}", "??"),
            Self::Revealed(face) => face.fmt(f),
        }
    }
}

// Wire shape of a card. The server also sends a `value` field on some
// deployments; it carries no identity and is ignored.
#[derive(Deserialize, Serialize)]
struct WireCard {
    #[serde(default)]
    rank: String,
    #[serde(default)]
    suit: String,
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = WireCard::deserialize(deserializer)?;
        if wire.rank.is_empty() {
            return Ok(Self::Masked);
        }
        let rank = Rank::from_wire(&wire.rank)
            .ok_or_else(|| de::Error::custom(format!("unknown card rank: {:?}", wire.rank)))?;
        let suit = Suit::from_wire(&wire.suit)
            .ok_or_else(|| de::Error::custom(format!("unknown card suit: {:?}", wire.suit)))?;
        Ok(Self::Revealed(CardFace { rank, suit }))
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = match self {
            Self::Masked => WireCard {
                rank: String::new(),
                suit: String::new(),
            },
            Self::Revealed(face) => WireCard {
                rank: face.rank.wire_str().to_string(),
                suit: face.suit.wire_str().to_string(),
            },
        };
        wire.serialize(serializer)
    }
}

/// Displayable score of one hand.
///
/// `Unknown` whenever any card in the hand is masked; the server's numeric
/// score is not trusted while a card is hidden.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HandScore {
    Known(u32),
    Unknown,
}

impl fmt::Display for HandScore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Known(score) => write!(f, "{score}"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// One hand as reported by the server. Card order is deal order; index 1 of
/// the dealer hand is always the hole card.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandSnapshot {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub score: u32,
}

impl HandSnapshot {
    /// Score for presentation. [`HandScore::Unknown`] if any card is masked,
    /// regardless of the numeric `score` the server reported.
    pub fn display_score(&self) -> HandScore {
        if self.cards.iter().any(Card::is_masked) {
            HandScore::Unknown
        } else {
            HandScore::Known(self.score)
        }
    }
}

/// Game status as reported by the server.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GameStatus {
    PlayerTurn,
    DealerTurn,
    PlayerWon,
    DealerWon,
    Push,
    PlayerBust,
    DealerBust,
}

impl GameStatus {
    /// Whether the player may still act.
    pub fn is_player_turn(&self) -> bool {
        matches!(self, Self::PlayerTurn)
    }

    /// Whether the round is settled.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::PlayerTurn | Self::DealerTurn)
    }
}

/// One complete, authoritative game-state payload from the server.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Snapshot {
    pub id: String,
    pub status: GameStatus,
    pub player_hand: HandSnapshot,
    pub dealer_hand: HandSnapshot,
    /// Present only after a successful split action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_hand: Option<HandSnapshot>,
    /// 0 = primary hand, 1 = split hand.
    #[serde(default)]
    pub current_hand_index: Option<usize>,
    #[serde(default)]
    pub player_balance: Option<i64>,
    #[serde(default)]
    pub current_bet: Option<i64>,
    #[serde(default)]
    pub payout: Option<i64>,
}

/// Player identity and balance, from the player endpoints.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: String,
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_card_deserializes_from_empty_rank() {
        let card: Card = serde_json::from_str(r#"{"rank":"","suit":""}"#).unwrap();
        assert_eq!(card, Card::Masked);
    }

    #[test]
    fn test_masked_card_ignores_leftover_suit() {
        // Some server versions blank only the rank.
        let card: Card = serde_json::from_str(r#"{"rank":"","suit":"Hearts"}"#).unwrap();
        assert_eq!(card, Card::Masked);
    }

    #[test]
    fn test_revealed_card_deserializes() {
        let card: Card = serde_json::from_str(r#"{"rank":"10","suit":"Diamonds"}"#).unwrap();
        assert_eq!(
            card,
            Card::Revealed(CardFace {
                rank: Rank::Ten,
                suit: Suit::Diamonds,
            })
        );
    }

    #[test]
    fn test_card_tolerates_extra_wire_fields() {
        let card: Card = serde_json::from_str(r#"{"rank":"A","suit":"Spades","value":11}"#).unwrap();
        assert_eq!(
            card,
            Card::Revealed(CardFace {
                rank: Rank::Ace,
                suit: Suit::Spades,
            })
        );
    }

    #[test]
    fn test_unknown_rank_is_an_error() {
        let result: Result<Card, _> = serde_json::from_str(r#"{"rank":"11","suit":"Hearts"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_masked_card_serializes_to_sentinel() {
        let json = serde_json::to_value(Card::Masked).unwrap();
        assert_eq!(json["rank"], "");
        assert_eq!(json["suit"], "");
    }

    #[test]
    fn test_display_score_known() {
        let hand: HandSnapshot = serde_json::from_str(
            r#"{"cards":[{"rank":"K","suit":"Clubs"},{"rank":"7","suit":"Hearts"}],"score":17}"#,
        )
        .unwrap();
        assert_eq!(hand.display_score(), HandScore::Known(17));
    }

    #[test]
    fn test_display_score_unknown_while_masked() {
        // The numeric score must not be trusted while a card is hidden.
        let hand: HandSnapshot = serde_json::from_str(
            r#"{"cards":[{"rank":"A","suit":"Spades"},{"rank":"","suit":""}],"score":21}"#,
        )
        .unwrap();
        assert_eq!(hand.display_score(), HandScore::Unknown);
        assert_eq!(hand.display_score().to_string(), "?");
    }

    #[test]
    fn test_snapshot_deserializes_without_optional_fields() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "id": "abc-123",
                "status": "PlayerTurn",
                "player_hand": {"cards": [], "score": 0},
                "dealer_hand": {"cards": [], "score": 0}
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.id, "abc-123");
        assert_eq!(snapshot.status, GameStatus::PlayerTurn);
        assert!(snapshot.split_hand.is_none());
        assert!(snapshot.player_balance.is_none());
        assert!(snapshot.payout.is_none());
    }

    #[test]
    fn test_snapshot_deserializes_split_fields() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "id": "abc-123",
                "status": "PlayerTurn",
                "player_hand": {"cards": [{"rank":"8","suit":"Clubs"},{"rank":"3","suit":"Hearts"}], "score": 11},
                "dealer_hand": {"cards": [{"rank":"9","suit":"Spades"},{"rank":"","suit":""}], "score": 0},
                "split_hand": {"cards": [{"rank":"8","suit":"Diamonds"},{"rank":"K","suit":"Hearts"}], "score": 18},
                "current_hand_index": 1,
                "player_balance": 80,
                "current_bet": 10
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.current_hand_index, Some(1));
        let split = snapshot.split_hand.unwrap();
        assert_eq!(split.cards.len(), 2);
        assert_eq!(split.score, 18);
    }

    #[test]
    fn test_status_classification() {
        assert!(GameStatus::PlayerTurn.is_player_turn());
        assert!(!GameStatus::PlayerTurn.is_terminal());
        assert!(!GameStatus::DealerTurn.is_terminal());
        for status in [
            GameStatus::PlayerWon,
            GameStatus::DealerWon,
            GameStatus::Push,
            GameStatus::PlayerBust,
            GameStatus::DealerBust,
        ] {
            assert!(status.is_terminal());
            assert!(!status.is_player_turn());
        }
    }

    #[test]
    fn test_card_display() {
        let card = Card::Revealed(CardFace {
            rank: Rank::Queen,
            suit: Suit::Hearts,
        });
        assert_eq!(card.to_string(), " Q♥");
        assert_eq!(Card::Masked.to_string(), " ??");
    }
}
