//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::MessagePushError;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 履歴の replay 中にコネクションが閉じた
    #[error("connection closed before history replay finished: {0}")]
    ReplayFailed(#[from] MessagePushError),
}
