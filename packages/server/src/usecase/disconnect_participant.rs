//! UseCase: 参加者切断処理
//!
//! コネクションの終了時（正常終了・エラー・タイムアウトのいずれでも）に呼ばれ、
//! Registry からコネクションを外します。最後のコネクションだった場合は退出通知を配信します。

use std::sync::Arc;

use crate::domain::{Connection, LeaveOutcome};

use super::broadcast::Broadcaster;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Broadcaster（leave と退出通知の配信）
    broadcaster: Arc<Broadcaster>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(broadcaster: Arc<Broadcaster>) -> Self {
        Self { broadcaster }
    }

    /// 参加者切断を実行
    ///
    /// 既に外れているコネクションに対して呼んでも何も起きない（冪等）。
    pub async fn execute(&self, connection: &Connection) -> LeaveOutcome {
        let outcome = self.broadcaster.remove_connection(connection).await;
        match &outcome {
            LeaveOutcome::Left { display_name } => {
                tracing::info!(
                    "Participant '{}' left (last connection '{}' closed)",
                    display_name,
                    connection.id()
                );
            }
            LeaveOutcome::StillConnected { remaining } => {
                tracing::info!(
                    "Connection '{}' of '{}' closed, {} connection(s) remain",
                    connection.id(),
                    connection.owner(),
                    remaining
                );
            }
            LeaveOutcome::NotFound => {
                tracing::debug!(
                    "Connection '{}' was already removed from the registry",
                    connection.id()
                );
            }
        }
        outcome
    }
}
