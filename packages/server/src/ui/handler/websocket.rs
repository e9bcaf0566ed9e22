//! WebSocket connection handlers.

use std::{sync::Arc, time::Duration};

use axum::{
    Extension,
    body::Bytes,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::{
    sync::{mpsc, watch},
    time::Instant,
};

use crate::{
    domain::{Connection, ConnectionId, ConnectionIdFactory, ParticipantId},
    ui::{
        session::{ChatSession, SessionError},
        state::AppState,
    },
    usecase::DisconnectParticipantUseCase,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    session: Option<Extension<ChatSession>>,
) -> impl IntoResponse {
    let participant_id = match session {
        Some(Extension(session)) => session.participant_id(),
        None => Err(SessionError::Missing),
    };

    ws.on_upgrade(move |socket| async move {
        match participant_id {
            Ok(participant_id) => handle_socket(socket, state, participant_id).await,
            Err(e) => reject_socket(socket, e).await,
        }
    })
}

/// Close a socket that has no usable session. Nothing is registered.
async fn reject_socket(mut socket: WebSocket, error: SessionError) {
    tracing::warn!("Closing WebSocket without registering: {}", error);
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: error.to_string().into(),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

/// Spawns a task that receives lines from the rx channel and pushes them to the WebSocket sender.
///
/// The same task sends a keep-alive ping every `ping_interval`. The receive
/// loop signals `pong_rx` on every pong; a ping left unanswered for
/// `pong_timeout` ends the task, as does a failed write. Either way the whole
/// connection ends.
fn pusher_loop(
    connection_id: ConnectionId,
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    mut pong_rx: watch::Receiver<()>,
    ping_interval: Duration,
    pong_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ping = tokio::time::interval_at(Instant::now() + ping_interval, ping_interval);
        // Oldest ping that has not been answered yet
        let mut unanswered_since: Option<Instant> = None;
        loop {
            let pong_deadline = unanswered_since.map(|sent| sent + pong_timeout);
            tokio::select! {
                line = rx.recv() => {
                    let Some(line) = line else { break };
                    if sender.send(Message::Text(line.into())).await.is_err() {
                        break;
                    }
                }
                _ = ping.tick() => {
                    if let Err(e) = sender.send(Message::Ping(Bytes::new())).await {
                        tracing::debug!("Keep-alive ping failed: {}", e);
                        break;
                    }
                    if unanswered_since.is_none() {
                        unanswered_since = Some(Instant::now());
                    }
                }
                changed = pong_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    unanswered_since = None;
                }
                _ = tokio::time::sleep_until(pong_deadline.unwrap_or_else(Instant::now)),
                    if pong_deadline.is_some() =>
                {
                    tracing::info!(
                        "Connection '{}' did not answer a ping within {:?}",
                        connection_id,
                        pong_timeout
                    );
                    break;
                }
            }
        }
    })
}

/// Registry membership of one connection.
///
/// `release` runs the leave on the normal path. If the handler unwinds or is
/// cancelled before that, `Drop` schedules the same leave on the runtime.
struct Membership {
    connection: Connection,
    disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    released: bool,
}

impl Membership {
    fn new(
        connection: Connection,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    ) -> Self {
        Self {
            connection,
            disconnect_participant_usecase,
            released: false,
        }
    }

    async fn release(mut self) {
        self.disconnect_participant_usecase
            .execute(&self.connection)
            .await;
        self.released = true;
    }
}

impl Drop for Membership {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let connection = self.connection.clone();
                let usecase = self.disconnect_participant_usecase.clone();
                handle.spawn(async move {
                    usecase.execute(&connection).await;
                });
            }
            Err(_) => tracing::warn!(
                "No runtime to release connection '{}'",
                self.connection.id()
            ),
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, participant_id: ParticipantId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive lines
    let (tx, rx) = mpsc::unbounded_channel();
    let connection = Connection::new(ConnectionIdFactory::generate(), participant_id.clone(), tx);
    let connection_id = connection.id();

    // Spawn a task to push lines (and pings) to this connection
    let (pong_tx, pong_rx) = watch::channel(());
    let mut send_task = pusher_loop(
        connection_id,
        rx,
        sender,
        pong_rx,
        state.ping_interval,
        state.pong_timeout,
    );

    // Register the connection; history is replayed before anything else is queued
    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection.clone())
        .await
    {
        tracing::warn!("Connection '{}' closed while joining: {}", connection_id, e);
        send_task.abort();
        return;
    }
    let membership = Membership::new(connection, state.disconnect_participant_usecase.clone());

    // Spawn a task to receive lines from this connection
    let router = state.command_router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", participant_id, text.as_str());
                    router.handle(&participant_id, text.as_str()).await;
                }
                Message::Binary(data) => {
                    tracing::debug!("Ignoring {} bytes of binary data", data.len());
                }
                Message::Pong(_) => {
                    pong_tx.send_replace(());
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                Message::Ping(_) => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    membership.release().await;
}
