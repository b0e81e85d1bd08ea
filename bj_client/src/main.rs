//! A blackjack client TUI for a server-authoritative blackjack table.
//!
//! The client holds no game logic at all: it requests actions over HTTP,
//! feeds the returned snapshots through the reconciliation core, and renders
//! the resulting view updates in a terminal UI.

use anyhow::{Context, Result};
use pico_args::Arguments;
use std::path::PathBuf;

use bj_client::{
    api_client::ApiClient,
    session::{self, IdentityStore},
    tui_app::TuiApp,
};

const HELP: &str = "\
Connect to a blackjack server

USAGE:
  bj_client [OPTIONS]

OPTIONS:
  --server URL          Server URL  [default: http://localhost:8080]
  --data-dir PATH       Where to keep the player identity  [default: .bj_client]

FLAGS:
  -h, --help            Print help information
";

struct Args {
    server_url: String,
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        server_url: pargs
            .value_from_str("--server")
            .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        data_dir: pargs
            .value_from_str("--data-dir")
            .unwrap_or_else(|_| PathBuf::from(".bj_client")),
    };

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let api = ApiClient::new(args.server_url.clone());
    let store = IdentityStore::new(&args.data_dir);

    // Establish the player identity before taking over the terminal; a
    // stale identifier is silently replaced with a fresh one.
    println!("Connecting to {}...", args.server_url);
    let (session, player) = session::establish(&api, &store)
        .await
        .context("Failed to establish a player session")?;
    println!("Playing as {} (balance: ${})", player.id, player.balance);

    // Initialize terminal
    let terminal = ratatui::init();

    // Create and run TUI app
    let app = TuiApp::new(api, session, &player);
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    result
}
