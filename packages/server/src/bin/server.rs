//! Irori group chat server.
//!
//! Accepts WebSocket connections on `/ws`, identifies each browser or client by
//! its `SESSION` cookie and fans chat lines out to everyone in the room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server
//! cargo run --bin irori-server -- --host 0.0.0.0 --port 3000 --history-capacity 50
//! ```

use std::{num::NonZeroUsize, sync::Arc, time::Duration};

use clap::Parser;
use irori_server::{
    domain::DEFAULT_HISTORY_CAPACITY,
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRoomRepository},
    ui::{Server, ServerConfig},
    usecase::{
        Broadcaster, CommandRouter, ConnectParticipantUseCase, DisconnectParticipantUseCase,
        ListParticipantsUseCase, RenameParticipantUseCase, SendMessageUseCase,
    },
};
use irori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "irori-server")]
#[command(about = "WebSocket group chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of recent chat messages replayed to new connections
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: NonZeroUsize,

    /// Seconds between keep-alive pings
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    ping_interval_secs: u64,

    /// Seconds to wait for a pong after a ping before dropping the connection
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
    pong_timeout_secs: u64,

    /// Do not issue SESSION cookies; connections without one are refused
    #[arg(long)]
    no_issue_sessions: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. Broadcaster
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (in-memory registry + history)
    let repository = Arc::new(InMemoryChatRoomRepository::with_history_capacity(
        args.history_capacity,
    ));
    tracing::info!(
        "Chat room created (history capacity: {})",
        args.history_capacity
    );

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create Broadcaster
    let broadcaster = Arc::new(Broadcaster::new(repository.clone(), message_pusher));

    // 4. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        repository.clone(),
        broadcaster.clone(),
    ));
    let disconnect_participant_usecase =
        Arc::new(DisconnectParticipantUseCase::new(broadcaster.clone()));
    let list_participants_usecase = Arc::new(ListParticipantsUseCase::new(repository.clone()));
    let command_router = Arc::new(CommandRouter::new(
        broadcaster.clone(),
        Arc::new(SendMessageUseCase::new(
            repository.clone(),
            broadcaster.clone(),
        )),
        Arc::new(RenameParticipantUseCase::new(
            repository.clone(),
            broadcaster.clone(),
        )),
        list_participants_usecase.clone(),
    ));

    // 5. Create and run the server
    let config = ServerConfig {
        ping_interval: Duration::from_secs(args.ping_interval_secs),
        pong_timeout: Duration::from_secs(args.pong_timeout_secs),
        issue_sessions: !args.no_issue_sessions,
    };
    let server = Server::new(
        config,
        connect_participant_usecase,
        disconnect_participant_usecase,
        command_router,
        list_participants_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
