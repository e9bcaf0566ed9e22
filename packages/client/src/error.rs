//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The server closed the connection with a policy violation (e.g. no session)
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The URL or session id cannot be turned into a WebSocket request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
