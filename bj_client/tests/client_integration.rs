//! Integration tests for bj_client network functionality.
//!
//! Tests network error handling against unreachable hosts; no running
//! server is required.

use bj_client::api_client::{ApiClient, GameAction};
use bj_client::session::IdentityStore;
use std::time::Duration;

// ============================================================================
// Network Error Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_connection_refused() {
    // Try to connect to an invalid port
    let client = ApiClient::new("http://localhost:19999".to_string());

    let result = client.start_game("player-1", 5).await;

    assert!(result.is_err(), "Should fail when server is not available");
    let error_msg = result.unwrap_err().to_string();
    assert!(
        error_msg.contains("Failed to send start game request"),
        "Error should indicate connection failure: {}",
        error_msg
    );
}

#[tokio::test]
async fn test_connection_refused_on_action() {
    let client = ApiClient::new("http://localhost:19999".to_string());

    let result = client
        .perform_action("player-1", "game-1", GameAction::Hit)
        .await;

    assert!(result.is_err(), "Should fail when server is not available");
}

#[tokio::test]
async fn test_connection_refused_on_player_lookup() {
    let client = ApiClient::new("http://localhost:19999".to_string());

    // A transport failure is not the same as a 404: it must be an error,
    // not a "create a new identity" signal.
    let result = client.get_player("player-1").await;
    assert!(result.is_err(), "Transport failure must not read as a 404");
}

#[tokio::test]
async fn test_malformed_url() {
    let client = ApiClient::new("not-a-valid-url".to_string());

    let result = client.create_player().await;

    assert!(result.is_err(), "Should fail with malformed URL");
}

#[tokio::test]
async fn test_no_automatic_retry_on_failure() {
    let client = ApiClient::new("http://localhost:19999".to_string());

    let start = std::time::Instant::now();
    let result = client.start_game("player-1", 5).await;
    let elapsed = start.elapsed();

    // Should fail quickly without retries (< 5 seconds)
    assert!(result.is_err());
    assert!(
        elapsed < Duration::from_secs(5),
        "Should not retry automatically"
    );
}

#[tokio::test]
async fn test_client_state_after_failed_request() {
    let client = ApiClient::new("http://localhost:19999".to_string());

    // First request fails
    let result1 = client.start_game("player-1", 5).await;
    assert!(result1.is_err());

    // Client should still be usable after failures
    let result2 = client.reset_balance("player-1").await;
    assert!(result2.is_err());
}

// ============================================================================
// Session Bootstrap Tests
// ============================================================================

#[tokio::test]
async fn test_establish_fails_without_server_but_keeps_identity_file() {
    let dir = std::env::temp_dir().join(format!("bj_client_establish_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let store = IdentityStore::new(&dir);
    store.save("persisted-player").unwrap();

    let client = ApiClient::new("http://localhost:19999".to_string());
    let result = bj_client::session::establish(&client, &store).await;

    // Transport failure: no identity re-creation, the stored id survives.
    assert!(result.is_err());
    assert_eq!(store.load(), Some("persisted-player".to_string()));

    let _ = std::fs::remove_dir_all(&dir);
}
