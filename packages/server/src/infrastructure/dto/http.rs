//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Response body of `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantsDto {
    pub count: usize,
    pub participants: Vec<ParticipantDetailDto>,
}

/// One participant as exposed over HTTP (the session id is never exposed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub display_name: String,
    /// Number of live connections
    pub connections: usize,
    /// RFC 3339 (JST)
    pub joined_at: String,
}
