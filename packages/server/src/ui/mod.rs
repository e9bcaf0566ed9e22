//! WebSocket chat server implementation.

mod handler;
mod server;
mod session;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig};
pub use session::{SESSION_COOKIE_NAME, SessionError};
