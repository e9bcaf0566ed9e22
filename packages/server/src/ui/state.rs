//! Server state shared by the handlers.

use std::{sync::Arc, time::Duration};

use crate::usecase::{
    CommandRouter, ConnectParticipantUseCase, DisconnectParticipantUseCase,
    ListParticipantsUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// CommandRouter（受信した行の解釈と処理）
    pub command_router: Arc<CommandRouter>,
    /// ListParticipantsUseCase（参加者一覧取得のユースケース）
    pub list_participants_usecase: Arc<ListParticipantsUseCase>,
    /// Keep-alive ping の送信間隔
    pub ping_interval: Duration,
    /// ping を送ってから pong を待つ時間
    pub pong_timeout: Duration,
}
