//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - コネクションの登録、履歴の replay、参加通知
//!
//! ### なぜこのテストが必要か
//! - 参加通知は「参加者の新規作成時に 1 回だけ」で、コネクションごとではないことを保証
//! - 参加直後のコネクションが、参加後の発言より先に履歴全体を受け取ることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続
//! - 正常系：同じ ID の 2 本目のコネクション
//! - 異常系：replay 前にコネクションが閉じていた

use std::sync::Arc;

use crate::domain::{ChatMessage, ChatRoomRepository, Connection, JoinOutcome};

use super::{broadcast::Broadcaster, error::ConnectError};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRoomRepository>,
    /// Broadcaster（参加通知の配信）
    broadcaster: Arc<Broadcaster>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn ChatRoomRepository>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - 新しく確立したコネクション
    ///
    /// # Returns
    ///
    /// * `Ok(JoinOutcome)` - 接続成功
    /// * `Err(ConnectError)` - replay 前にコネクションが閉じていた（Registry には登録されない）
    pub async fn execute(&self, connection: Connection) -> Result<JoinOutcome, ConnectError> {
        // 1. Registry に登録し、履歴を replay
        let outcome = self.repository.join(connection.clone()).await?;
        tracing::info!(
            "Connection '{}' joined as '{}' (replayed {} messages)",
            connection.id(),
            outcome.display_name,
            outcome.replayed
        );

        // 2. 新規参加者のときだけ参加通知
        if outcome.created {
            self.broadcaster
                .send_to_all(&ChatMessage::member_joined(&outcome.display_name))
                .await;
            tracing::info!("Broadcasted member-joined for '{}'", outcome.display_name);
        }

        Ok(outcome)
    }
}
