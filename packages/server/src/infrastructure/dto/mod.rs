//! Data Transfer Objects (DTOs) for the HTTP API.
//!
//! WebSocket frames are plain `sender::kind::body` lines rendered by the
//! domain, so only the HTTP surface needs DTOs.

pub mod conversion;
pub mod http;
