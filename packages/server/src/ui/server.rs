//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    CommandRouter, ConnectParticipantUseCase, DisconnectParticipantUseCase,
    ListParticipantsUseCase,
};

use super::{
    handler::{health_check, list_participants, websocket_handler},
    session::{SessionPolicy, session_middleware},
    signal::shutdown_signal,
    state::AppState,
};

/// Transport settings
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    /// Interval between keep-alive pings on each socket
    pub ping_interval: Duration,
    /// How long a ping may go unanswered before the connection is dropped
    pub pong_timeout: Duration,
    /// Issue a `SESSION` cookie to requests that carry none
    pub issue_sessions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(60),
            pong_timeout: Duration::from_secs(15),
            issue_sessions: true,
        }
    }
}

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     ServerConfig::default(),
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     command_router,
///     list_participants_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    config: ServerConfig,
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// CommandRouter（受信した行の処理）
    command_router: Arc<CommandRouter>,
    /// ListParticipantsUseCase（参加者一覧取得のユースケース）
    list_participants_usecase: Arc<ListParticipantsUseCase>,
}

impl Server {
    pub fn new(
        config: ServerConfig,
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        command_router: Arc<CommandRouter>,
        list_participants_usecase: Arc<ListParticipantsUseCase>,
    ) -> Self {
        Self {
            config,
            connect_participant_usecase,
            disconnect_participant_usecase,
            command_router,
            list_participants_usecase,
        }
    }

    /// Build the axum router without binding a listener
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            disconnect_participant_usecase: self.disconnect_participant_usecase,
            command_router: self.command_router,
            list_participants_usecase: self.list_participants_usecase,
            ping_interval: self.config.ping_interval,
            pong_timeout: self.config.pong_timeout,
        });
        let session_policy = SessionPolicy {
            issue_sessions: self.config.issue_sessions,
        };

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(list_participants))
            .with_state(app_state)
            .layer(from_fn_with_state(session_policy, session_middleware))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the WebSocket chat server
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
