//! Irori terminal chat client.
//!
//! Connects to the chat server with a `SESSION` cookie and sends every typed
//! line as is, so `/who`, `/user <name>` and `/help` work as commands.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-client
//! cargo run --bin irori-client -- --name Alice --session-id alice-laptop
//! ```

use clap::Parser;
use irori_shared::logger::setup_logger;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "irori-client")]
#[command(about = "WebSocket group chat client", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Session id sent as the SESSION cookie (reuse it to join from several terminals as one participant)
    #[arg(short = 's', long)]
    session_id: Option<String>,

    /// Display name to request after connecting
    #[arg(short = 'n', long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let session_id = args
        .session_id
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    if let Err(e) = irori_client::run_client(args.url, session_id, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
