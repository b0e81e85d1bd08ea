//! Internal modules for the blackjack client.
//!
//! This library provides command parsing, the API client, session
//! management, and the TUI used by the bj_client binary.

pub mod api_client;
pub mod commands;
pub mod session;
pub mod tui_app;
