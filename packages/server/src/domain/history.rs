//! 直近の発言履歴（固定容量の FIFO）
//!
//! 発言（chat）の配信時にだけ追加され、容量を超えると最も古いものから捨てられる。
//! 読み出しは参加直後のコネクションへの `replay` のみ。

use std::{collections::VecDeque, num::NonZeroUsize};

use super::{connection::Connection, entity::ChatMessage, error::MessagePushError};

/// 既定の履歴容量（サーバーの `--history-capacity` の既定値）
pub const DEFAULT_HISTORY_CAPACITY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<ChatMessage>,
    capacity: NonZeroUsize,
}

impl HistoryBuffer {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// 履歴に追加し、容量を超えた場合は追い出された最古のエントリを返す
    pub fn push(&mut self, message: ChatMessage) -> Option<ChatMessage> {
        let evicted = if self.entries.len() == self.capacity.get() {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(message);
        evicted
    }

    /// 保持している全エントリを古い順に `connection` だけへ送る
    ///
    /// 送信できたエントリ数を返す。途中で失敗した場合はそこで打ち切る。
    pub fn replay(&self, connection: &Connection) -> Result<usize, MessagePushError> {
        for entry in &self.entries {
            connection.push(&entry.render())?;
        }
        Ok(self.entries.len())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::{ConnectionIdFactory, ParticipantId};

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn test_connection() -> (Connection, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let owner = ParticipantId::new("alice".to_string()).unwrap();
        (Connection::new(ConnectionIdFactory::generate(), owner, tx), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_push_within_capacity_keeps_everything() {
        // テスト項目: 容量内であれば追い出しは発生しない
        // given (前提条件):
        let mut history = HistoryBuffer::new(capacity(3));

        // when (操作):
        let evicted: Vec<_> = (0..3)
            .map(|i| history.push(ChatMessage::chat("alice", format!("m{}", i))))
            .collect();

        // then (期待する結果):
        assert!(evicted.iter().all(Option::is_none));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_overflow_evicts_oldest_first() {
        // テスト項目: 容量 + 1 件追加すると最も古いエントリが追い出され、直近 capacity 件が残る
        // given (前提条件):
        let mut history = HistoryBuffer::new(capacity(3));
        for i in 0..3 {
            history.push(ChatMessage::chat("alice", format!("m{}", i)));
        }
        let (connection, mut rx) = test_connection();

        // when (操作):
        let evicted = history.push(ChatMessage::chat("alice", "m3"));

        // then (期待する結果):
        assert_eq!(evicted, Some(ChatMessage::chat("alice", "m0")));
        assert_eq!(history.len(), 3);
        history.replay(&connection).unwrap();
        assert_eq!(
            drain(&mut rx),
            vec!["alice::chat::m1", "alice::chat::m2", "alice::chat::m3"]
        );
    }

    #[test]
    fn test_replay_empty_history_sends_nothing() {
        // テスト項目: 履歴が空の場合 replay は何も送らない
        // given (前提条件):
        let history = HistoryBuffer::new(DEFAULT_HISTORY_CAPACITY);
        let (connection, mut rx) = test_connection();

        // when (操作):
        let sent = history.replay(&connection).unwrap();

        // then (期待する結果):
        assert_eq!(sent, 0);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_replay_to_closed_connection_fails() {
        // テスト項目: 切断済みのコネクションへの replay はエラーになる
        // given (前提条件):
        let mut history = HistoryBuffer::new(capacity(2));
        history.push(ChatMessage::chat("alice", "hello"));
        let (connection, rx) = test_connection();
        drop(rx);

        // when (操作):
        let result = history.replay(&connection);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ConnectionClosed(connection.id()))
        );
    }
}
