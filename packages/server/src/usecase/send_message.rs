//! UseCase: メッセージ送信処理
//!
//! 発言を履歴に追加し、その時点の全コネクションへ配信します。
//! 履歴への追加と配信先のスナップショットは Repository 上の 1 つの不可分操作です。

use std::sync::Arc;

use crate::domain::{ChatRoomRepository, ParticipantId};

use super::broadcast::{Broadcaster, DeliveryReport};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRoomRepository>,
    /// Broadcaster（発言の配信）
    broadcaster: Arc<Broadcaster>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn ChatRoomRepository>, broadcaster: Arc<Broadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `from` - 送信者の参加者 ID
    /// * `body` - 発言本文（受け取った行そのまま）
    pub async fn execute(&self, from: &ParticipantId, body: String) -> DeliveryReport {
        let (message, targets) = self.repository.record_chat(from, body).await;
        tracing::debug!(
            "Broadcasting chat from '{}' to {} connection(s)",
            message.sender_name,
            targets.len()
        );
        self.broadcaster.deliver(targets, &message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::TestChat;

    #[tokio::test]
    async fn test_send_message_reaches_everyone_including_sender() {
        // テスト項目: 発言は送信者を含む全コネクションに 1 回ずつ届き、履歴に 1 件追加される
        // given (前提条件):
        let chat = TestChat::new(10);
        let mut alice = chat.join("alice").await;
        let mut bob = chat.join("bob").await;
        alice.drain();
        bob.drain();
        let usecase = SendMessageUseCase::new(chat.repository.clone(), chat.broadcaster.clone());

        // when (操作):
        let report = usecase.execute(&alice.id, "hello".to_string()).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert_eq!(alice.drain(), vec!["user1::chat::hello"]);
        assert_eq!(bob.drain(), vec!["user1::chat::hello"]);
        assert_eq!(chat.repository.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_history_keeps_latest_capacity_entries() {
        // テスト項目: 容量 + 1 件の発言後、履歴には直近 capacity 件だけが古い順に残る
        // given (前提条件):
        let capacity = 3;
        let chat = TestChat::new(capacity);
        let alice = chat.join("alice").await;
        let usecase = SendMessageUseCase::new(chat.repository.clone(), chat.broadcaster.clone());

        // when (操作):
        for i in 0..=capacity {
            usecase.execute(&alice.id, format!("m{}", i)).await;
        }
        let mut late = chat.join("late").await;

        // then (期待する結果):
        assert_eq!(chat.repository.history_len().await, capacity);
        let lines = late.drain();
        assert_eq!(
            &lines[..3],
            &[
                "user1::chat::m1",
                "user1::chat::m2",
                "user1::chat::m3"
            ]
        );
    }
}
