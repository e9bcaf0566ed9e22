//! InMemory ChatRoom Repository 実装
//!
//! ドメイン層が定義する ChatRoomRepository trait の具体的な実装。
//! `ChatRoom` 集約を 1 つの `tokio::sync::Mutex` で保護し、
//! 各メソッドを 1 回のロック区間で完結させることで操作の原子性を保証します。

use std::{num::NonZeroUsize, sync::Arc};

use async_trait::async_trait;
use irori_shared::time::{Clock, SystemClock};
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ChatRoom, ChatRoomRepository, Connection, ConnectionId, DisplayName, JoinOutcome,
    LeaveOutcome, MessagePushError, Participant, ParticipantId, RenameError, RenameOutcome,
    Timestamp,
};

/// インメモリ ChatRoom Repository 実装
pub struct InMemoryChatRoomRepository {
    /// ChatRoom ドメインモデル
    room: Arc<Mutex<ChatRoom>>,
    /// 参加時刻の取得に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryChatRoomRepository {
    /// 新しい InMemoryChatRoomRepository を作成
    pub fn new(room: Arc<Mutex<ChatRoom>>, clock: Arc<dyn Clock>) -> Self {
        Self { room, clock }
    }

    /// 指定した履歴容量の空の ChatRoom とシステム時計で作成
    pub fn with_history_capacity(history_capacity: NonZeroUsize) -> Self {
        Self::new(
            Arc::new(Mutex::new(ChatRoom::new(history_capacity))),
            Arc::new(SystemClock),
        )
    }

    /// 保持している発言履歴の件数
    #[cfg(test)]
    pub(crate) async fn history_len(&self) -> usize {
        self.room.lock().await.history_len()
    }
}

#[async_trait]
impl ChatRoomRepository for InMemoryChatRoomRepository {
    async fn join(&self, connection: Connection) -> Result<JoinOutcome, MessagePushError> {
        let now = Timestamp::new(self.clock.now_jst_millis());
        let mut room = self.room.lock().await;
        room.join(connection, now)
    }

    async fn leave(&self, id: &ParticipantId, connection_id: &ConnectionId) -> LeaveOutcome {
        let mut room = self.room.lock().await;
        room.leave(id, connection_id)
    }

    async fn rename(
        &self,
        id: &ParticipantId,
        new_name: DisplayName,
    ) -> Result<RenameOutcome, RenameError> {
        let mut room = self.room.lock().await;
        room.rename(id, new_name)
    }

    async fn display_name_of(&self, id: &ParticipantId) -> String {
        self.room.lock().await.display_name_of(id)
    }

    async fn connections_of(&self, id: &ParticipantId) -> Vec<Connection> {
        self.room.lock().await.connections_of(id)
    }

    async fn all_connections(&self) -> Vec<Connection> {
        self.room.lock().await.all_connections()
    }

    async fn participant_names(&self) -> Vec<String> {
        self.room.lock().await.participant_names()
    }

    async fn participants(&self) -> Vec<Participant> {
        self.room.lock().await.participants()
    }

    async fn count_participants(&self) -> usize {
        self.room.lock().await.participant_count()
    }

    async fn record_chat(
        &self,
        id: &ParticipantId,
        body: String,
    ) -> (ChatMessage, Vec<Connection>) {
        let mut room = self.room.lock().await;
        room.record_chat(id, body)
    }
}

#[cfg(test)]
mod tests {
    use irori_shared::time::FixedClock;
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::ConnectionIdFactory;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryChatRoomRepository が ChatRoom 集約の操作を正しく委譲すること
    // - 参加時刻が注入した Clock から取られること
    // - 並行した join / leave の後でも Registry が整合していること
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から並行に呼ばれる共有状態の唯一の入口
    // - 1 回の呼び出しが不可分であることを保証する必要がある
    // ========================================

    fn create_test_repository() -> InMemoryChatRoomRepository {
        InMemoryChatRoomRepository::new(
            Arc::new(Mutex::new(ChatRoom::new(NonZeroUsize::new(10).unwrap()))),
            Arc::new(FixedClock::new(1_672_498_800_000)),
        )
    }

    fn connect(raw_id: &str) -> (Connection, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ParticipantId::new(raw_id.to_string()).unwrap();
        (Connection::new(ConnectionIdFactory::generate(), id, tx), rx)
    }

    #[tokio::test]
    async fn test_join_uses_injected_clock() {
        // テスト項目: 参加時刻は注入した Clock の値になる
        // given (前提条件):
        let repo = create_test_repository();
        let (connection, _rx) = connect("alice");

        // when (操作):
        let outcome = repo.join(connection).await.unwrap();

        // then (期待する結果):
        assert!(outcome.created);
        let participants = repo.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].joined_at.value(), 1_672_498_800_000);
    }

    #[tokio::test]
    async fn test_leave_removes_participant() {
        // テスト項目: 唯一のコネクションを leave すると参加者が削除される
        // given (前提条件):
        let repo = create_test_repository();
        let (connection, _rx) = connect("alice");
        repo.join(connection.clone()).await.unwrap();

        // when (操作):
        let outcome = repo.leave(connection.owner(), &connection.id()).await;

        // then (期待する結果):
        assert!(matches!(outcome, LeaveOutcome::Left { .. }));
        assert_eq!(repo.count_participants().await, 0);
        assert!(repo.all_connections().await.is_empty());
    }

    #[tokio::test]
    async fn test_record_chat_appends_history() {
        // テスト項目: record_chat で履歴が増え、配信先に全コネクションが含まれる
        // given (前提条件):
        let repo = create_test_repository();
        let (alice, _rx_a) = connect("alice");
        let (bob, _rx_b) = connect("bob");
        repo.join(alice.clone()).await.unwrap();
        repo.join(bob).await.unwrap();

        // when (操作):
        let (message, targets) = repo.record_chat(alice.owner(), "hello".to_string()).await;

        // then (期待する結果):
        assert_eq!(message.body, "hello");
        assert_eq!(targets.len(), 2);
        assert_eq!(repo.history_len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_join_and_leave_keep_registry_consistent() {
        // テスト項目: 並行に join / leave しても参加者数とコネクション数が整合する
        // given (前提条件):
        let repo = Arc::new(create_test_repository());
        let mut handles = Vec::new();

        // when (操作): 20 参加者 × 2 コネクションを並行に join し、1 本ずつ leave する
        for i in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let raw = format!("participant-{}", i);
                let (first, rx1) = connect(&raw);
                let (second, rx2) = connect(&raw);
                repo.join(first.clone()).await.unwrap();
                repo.join(second).await.unwrap();
                repo.leave(first.owner(), &first.id()).await;
                (rx1, rx2)
            }));
        }
        let mut receivers = Vec::new();
        for handle in handles {
            receivers.push(handle.await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(repo.count_participants().await, 20);
        assert_eq!(repo.all_connections().await.len(), 20);
        assert_eq!(repo.participant_names().await.len(), 20);
    }
}
