//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use irori_shared::time::get_jst_timestamp;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        handshake::client::Request,
        http::{HeaderValue, header::COOKIE},
        protocol::{Message, frame::coding::CloseCode},
    },
};

use crate::error::ClientError;

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

const SESSION_COOKIE_NAME: &str = "SESSION";

/// Build the upgrade request carrying the session cookie
pub fn build_request(url: &str, session_id: &str) -> Result<Request, ClientError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
    let cookie = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE_NAME, session_id))
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
    request.headers_mut().insert(COOKIE, cookie);
    Ok(request)
}

/// Run one WebSocket session until the user quits or the connection ends.
///
/// Returns `Ok(())` when the input closes (Ctrl+C / Ctrl+D).
pub async fn run_client_session(
    url: &str,
    session_id: &str,
    name: Option<&str>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let request = build_request(url, session_id)?;
    let (ws_stream, _response) = connect_async(request)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");
    println!("\nType messages and press Enter to send. /help lists commands. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    if let Some(name) = name {
        write
            .send(Message::text(format!("/user {}", name)))
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    }

    // Spawn a task to handle incoming messages; it yields the reason the connection ended
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print!(
                        "{}",
                        MessageFormatter::format_line(text.as_str(), get_jst_timestamp())
                    );
                    redisplay_prompt();
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt();
                }
                Ok(Message::Close(Some(frame))) if frame.code == CloseCode::Policy => {
                    return ClientError::Rejected(frame.reason.as_str().to_string());
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    return ClientError::ConnectionError("Server closed the connection".into());
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return ClientError::ConnectionError(e.to_string());
                }
                _ => {}
            }
        }
        ClientError::ConnectionError("Connection lost".to_string())
    });

    // Forward typed lines until the input closes or the connection ends
    let result = loop {
        tokio::select! {
            reason = &mut read_task => {
                break Err(reason.unwrap_or_else(|e| ClientError::ConnectionError(e.to_string())));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    break Ok(());
                };
                if let Err(e) = write.send(Message::text(line)).await {
                    tracing::warn!("Failed to send message: {}", e);
                    break Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    };

    if result.is_ok() {
        write.close().await.ok();
    }
    read_task.abort();
    result
}
