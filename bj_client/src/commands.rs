use std::fmt;

/// Smallest bet the table accepts.
pub const MIN_BET: i64 = 1;
/// Largest bet the table accepts.
pub const MAX_BET: i64 = 10;

/// A parsed user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a new round with the given bet.
    Deal(i64),
    Hit,
    Stand,
    Split,
    /// Reset the player balance to the table default.
    Reset,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Deal command missing a bet amount.
    MissingBetAmount,
    /// Bet amount is not a valid number.
    InvalidBetAmount(String),
    /// Bet amount outside the table limits.
    BetOutOfRange(i64),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBetAmount => {
                write!(f, "Deal requires a bet amount (e.g., 'deal 5')")
            }
            Self::InvalidBetAmount(value) => write!(
                f,
                "Invalid bet amount '{}'. Must be a whole number between {} and {}",
                value, MIN_BET, MAX_BET
            ),
            Self::BetOutOfRange(value) => write!(
                f,
                "Bet of {} is outside the table limits ({} to {})",
                value, MIN_BET, MAX_BET
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Press Tab to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use bj_client::commands::{parse_command, Command};
///
/// assert!(matches!(parse_command("hit"), Ok(Command::Hit)));
/// assert!(matches!(parse_command("deal 5"), Ok(Command::Deal(5))));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Single-word commands
    match trimmed {
        "hit" => return Ok(Command::Hit),
        "stand" => return Ok(Command::Stand),
        "split" => return Ok(Command::Split),
        "reset" => return Ok(Command::Reset),
        _ => {}
    }

    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"deal") | Some(&"bet") => parse_deal_command(&parts),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a deal command: "deal AMOUNT"
fn parse_deal_command(parts: &[&str]) -> Result<Command, ParseError> {
    let value = parts.get(1).ok_or(ParseError::MissingBetAmount)?;
    let amount = value
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidBetAmount(value.to_string()))?;
    if !(MIN_BET..=MAX_BET).contains(&amount) {
        return Err(ParseError::BetOutOfRange(amount));
    }
    Ok(Command::Deal(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_hit() {
        let result = parse_command("hit");
        assert!(matches!(result, Ok(Command::Hit)));
    }

    #[test]
    fn test_parse_stand() {
        let result = parse_command("stand");
        assert!(matches!(result, Ok(Command::Stand)));
    }

    #[test]
    fn test_parse_split() {
        let result = parse_command("split");
        assert!(matches!(result, Ok(Command::Split)));
    }

    #[test]
    fn test_parse_reset() {
        let result = parse_command("reset");
        assert!(matches!(result, Ok(Command::Reset)));
    }

    // === Whitespace handling ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        let result = parse_command("  stand  ");
        assert!(matches!(result, Ok(Command::Stand)));
    }

    // === Deal command tests ===

    #[test]
    fn test_parse_deal_with_amount() {
        let result = parse_command("deal 5");
        assert!(matches!(result, Ok(Command::Deal(5))));
    }

    #[test]
    fn test_parse_bet_alias() {
        let result = parse_command("bet 10");
        assert!(matches!(result, Ok(Command::Deal(10))));
    }

    #[test]
    fn test_parse_deal_without_amount() {
        let result = parse_command("deal");
        assert!(matches!(result, Err(ParseError::MissingBetAmount)));
    }

    #[test]
    fn test_parse_deal_with_invalid_amount() {
        let result = parse_command("deal abc");
        assert!(matches!(result, Err(ParseError::InvalidBetAmount(_))));
    }

    #[test]
    fn test_parse_deal_with_float() {
        let result = parse_command("deal 2.5");
        assert!(matches!(result, Err(ParseError::InvalidBetAmount(_))));
    }

    #[test]
    fn test_parse_deal_below_minimum() {
        let result = parse_command("deal 0");
        assert!(matches!(result, Err(ParseError::BetOutOfRange(0))));
    }

    #[test]
    fn test_parse_deal_above_maximum() {
        let result = parse_command("deal 11");
        assert!(matches!(result, Err(ParseError::BetOutOfRange(11))));
    }

    #[test]
    fn test_parse_deal_at_limits() {
        assert!(matches!(parse_command("deal 1"), Ok(Command::Deal(1))));
        assert!(matches!(parse_command("deal 10"), Ok(Command::Deal(10))));
    }

    #[test]
    fn test_parse_deal_negative() {
        let result = parse_command("deal -5");
        assert!(matches!(result, Err(ParseError::BetOutOfRange(-5))));
    }

    // === Error cases ===

    #[test]
    fn test_parse_unrecognized_command() {
        let result = parse_command("fold");
        assert!(matches!(result, Err(ParseError::UnrecognizedCommand(_))));
    }

    #[test]
    fn test_parse_empty_string() {
        let result = parse_command("");
        assert!(matches!(result, Err(ParseError::UnrecognizedCommand(_))));
    }

    // === Error message tests ===

    #[test]
    fn test_error_message_invalid_bet_amount() {
        let error = ParseError::InvalidBetAmount("abc".to_string());
        let msg = error.to_string();
        assert!(msg.contains("Invalid bet amount"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_error_message_bet_out_of_range() {
        let error = ParseError::BetOutOfRange(50);
        let msg = error.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("table limits"));
    }

    #[test]
    fn test_error_message_unrecognized_command() {
        let error = ParseError::UnrecognizedCommand("xyz".to_string());
        let msg = error.to_string();
        assert!(msg.contains("Unrecognized command"));
        assert!(msg.contains("xyz"));
    }
}
