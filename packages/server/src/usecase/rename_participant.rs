//! UseCase: 表示名変更処理

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ChatRoomRepository, DisplayName, ParticipantId, RenameError, RenameOutcome,
};

use super::broadcast::Broadcaster;

/// 表示名変更のユースケース
pub struct RenameParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRoomRepository>,
    /// Broadcaster（改名通知の配信）
    broadcaster: Arc<Broadcaster>,
}

impl RenameParticipantUseCase {
    /// 新しい RenameParticipantUseCase を作成
    pub fn new(repository: Arc<dyn ChatRoomRepository>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// 表示名を変更し、改名通知を全コネクション（本人の他のコネクションを含む）に配信する
    ///
    /// 名前の検証は `DisplayName` の生成時に済んでいる。
    pub async fn execute(
        &self,
        id: &ParticipantId,
        new_name: DisplayName,
    ) -> Result<RenameOutcome, RenameError> {
        let outcome = self.repository.rename(id, new_name).await?;
        tracing::info!(
            "Participant renamed from '{}' to '{}'",
            outcome.previous,
            outcome.current
        );

        self.broadcaster
            .send_to_all(&ChatMessage::member_renamed(
                &outcome.previous,
                &outcome.current,
            ))
            .await;

        Ok(outcome)
    }
}
