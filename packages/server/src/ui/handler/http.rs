//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::ParticipantsDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the participants currently in the chat
pub async fn list_participants(State(state): State<Arc<AppState>>) -> Json<ParticipantsDto> {
    let participants = state.list_participants_usecase.participants().await;

    // Domain Model から DTO への変換
    Json(ParticipantsDto::from(participants))
}
