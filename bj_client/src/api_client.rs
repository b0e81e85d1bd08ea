//! HTTP API client for the blackjack server.
//!
//! Every game endpoint returns a full [`Snapshot`]; the client never asks
//! for partial state. Requests are never retried here: a failure is
//! surfaced and the user decides whether to try again.

use anyhow::{Context, Result};
use blackjack_view::model::{Player, Snapshot};
use serde::{Deserialize, Serialize};

/// API client for communicating with the blackjack server
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

/// A game action the player can request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameAction {
    Hit,
    Stand,
    Split,
}

impl GameAction {
    fn wire_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::Split => "split",
        }
    }
}

#[derive(Debug, Serialize)]
struct StartGameRequest {
    bet_amount: i64,
}

#[derive(Debug, Serialize)]
struct ActionRequest {
    action: &'static str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Start a new game with the given bet, identified by `player_id`
    pub async fn start_game(&self, player_id: &str, bet_amount: i64) -> Result<Snapshot> {
        let request = StartGameRequest { bet_amount };

        let response = self
            .client
            .post(format!("{}/api/games", self.base_url))
            .header("X-Player-ID", player_id)
            .json(&request)
            .send()
            .await
            .context("Failed to send start game request")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse game snapshot")
    }

    /// Request an action on a running game and receive the resulting snapshot
    pub async fn perform_action(
        &self,
        player_id: &str,
        game_id: &str,
        action: GameAction,
    ) -> Result<Snapshot> {
        let request = ActionRequest {
            action: action.wire_str(),
        };

        let response = self
            .client
            .post(format!("{}/api/games/{}/action", self.base_url, game_id))
            .header("X-Player-ID", player_id)
            .json(&request)
            .send()
            .await
            .context("Failed to send action request")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse game snapshot")
    }

    /// Create a fresh player identity
    pub async fn create_player(&self) -> Result<Player> {
        let response = self
            .client
            .post(format!("{}/api/players", self.base_url))
            .send()
            .await
            .context("Failed to send create player request")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        response.json().await.context("Failed to parse player")
    }

    /// Look up a player. `None` signals an unknown identifier; the caller
    /// is expected to re-create the identity.
    pub async fn get_player(&self, player_id: &str) -> Result<Option<Player>> {
        let response = self
            .client
            .get(format!("{}/api/players/{}", self.base_url, player_id))
            .send()
            .await
            .context("Failed to send get player request")?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        let player = response.json().await.context("Failed to parse player")?;
        Ok(Some(player))
    }

    /// Reset a player's balance to the table default
    pub async fn reset_balance(&self, player_id: &str) -> Result<Player> {
        let response = self
            .client
            .post(format!("{}/api/players/{}/reset", self.base_url, player_id))
            .send()
            .await
            .context("Failed to send reset balance request")?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        response.json().await.context("Failed to parse player")
    }
}

/// Extract the server's error payload, verbatim when possible.
async fn error_message(response: reqwest::Response) -> String {
    let text = response
        .text()
        .await
        .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => body.error,
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_strings() {
        assert_eq!(GameAction::Hit.wire_str(), "hit");
        assert_eq!(GameAction::Stand.wire_str(), "stand");
        assert_eq!(GameAction::Split.wire_str(), "split");
    }

    #[test]
    fn test_action_request_serializes_like_the_server_expects() {
        let json = serde_json::to_string(&ActionRequest {
            action: GameAction::Split.wire_str(),
        })
        .unwrap();
        assert_eq!(json, r#"{"action":"split"}"#);
    }

    #[test]
    fn test_start_game_request_serializes_bet() {
        let json = serde_json::to_string(&StartGameRequest { bet_amount: 5 }).unwrap();
        assert_eq!(json, r#"{"bet_amount":5}"#);
    }
}
