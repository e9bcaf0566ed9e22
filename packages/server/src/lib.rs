//! Irori group chat server.
//!
//! The core is a connection registry and message-routing engine: it tracks
//! which participants are connected through which sockets, interprets the
//! small chat command grammar and fans messages out to live connections.
//! The axum WebSocket transport and session cookie issuance live in `ui`.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
