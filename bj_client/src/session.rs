//! Client session context and player identity persistence.
//!
//! One [`Session`] replaces the scattered "current game id / last status /
//! player id" globals: it is created once at startup, threaded through each
//! action call, and its game fields are replaced when a round ends or a new
//! one starts. The player identifier is the only piece that survives a
//! restart, persisted as a small JSON file.

use anyhow::{Context, Result};
use blackjack_view::model::{GameStatus, Player, Snapshot};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api_client::ApiClient;

/// Session state for one run of the client.
#[derive(Clone, Debug)]
pub struct Session {
    /// Opaque player identifier, persisted across restarts.
    pub player_id: String,
    /// Identifier of the game currently accepting actions, if any.
    pub game_id: Option<String>,
    /// Status from the most recently applied snapshot.
    pub last_status: Option<GameStatus>,
}

impl Session {
    pub fn new(player_id: String) -> Self {
        Self {
            player_id,
            game_id: None,
            last_status: None,
        }
    }

    /// Record the snapshot the server just returned.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        self.game_id = Some(snapshot.id.clone());
        self.last_status = Some(snapshot.status);
    }

    /// Forget the current round, e.g. when returning to the bet screen.
    pub fn end_round(&mut self) {
        self.game_id = None;
        self.last_status = None;
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct StoredIdentity {
    player_id: String,
}

/// On-disk storage for the player identifier.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Store under `data_dir`, creating the directory on first save.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("player.json"),
        }
    }

    /// The persisted identifier, if a readable one exists. A missing or
    /// corrupt file is treated the same as no identity.
    pub fn load(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let stored: StoredIdentity = serde_json::from_str(&contents).ok()?;
        Some(stored.player_id)
    }

    /// Persist `player_id`, replacing any previous identity.
    pub fn save(&self, player_id: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let stored = StoredIdentity {
            player_id: player_id.to_string(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Establish a session: reuse the persisted identity when the server still
/// knows it, otherwise create a fresh one and persist it. A 404 on the
/// lookup is the expected signal for a stale identifier, not an error.
pub async fn establish(api: &ApiClient, store: &IdentityStore) -> Result<(Session, Player)> {
    if let Some(player_id) = store.load()
        && let Some(player) = api.get_player(&player_id).await?
    {
        return Ok((Session::new(player.id.clone()), player));
    }

    let player = api.create_player().await?;
    store.save(&player.id)?;
    Ok((Session::new(player.id.clone()), player))
}
