//! UseCase: 参加者一覧の取得

use std::sync::Arc;

use crate::domain::{ChatRoomRepository, Participant};

/// 参加者一覧取得のユースケース（`/who` と HTTP API で使う）
pub struct ListParticipantsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRoomRepository>,
}

impl ListParticipantsUseCase {
    pub fn new(repository: Arc<dyn ChatRoomRepository>) -> Self {
        Self { repository }
    }

    /// 表示名一覧（名前順）
    pub async fn names(&self) -> Vec<String> {
        self.repository.participant_names().await
    }

    /// 参加者の詳細一覧（表示名順）
    pub async fn participants(&self) -> Vec<Participant> {
        self.repository.participants().await
    }
}
