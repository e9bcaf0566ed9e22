//! ドメイン層のエラー定義

use thiserror::Error;

use super::value_object::{ConnectionId, MAX_DISPLAY_NAME_CHARS};

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 参加者 ID（セッション ID）が空
    #[error("participant id must not be empty")]
    EmptyParticipantId,

    /// 表示名が空（trim 後）
    #[error("display name must not be empty")]
    EmptyName,

    /// 表示名が文字数上限を超えている
    #[error("new name is too long: {} characters limit", MAX_DISPLAY_NAME_CHARS)]
    NameTooLong,
}

/// メッセージ送信（push）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先コネクションの writer が既に終了している
    #[error("connection '{0}' is closed")]
    ConnectionClosed(ConnectionId),
}

/// 表示名変更のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    /// 参加者が既に Registry に存在しない（切断と競合した場合）
    #[error("participant '{0}' is not connected")]
    ParticipantNotFound(String),
}
