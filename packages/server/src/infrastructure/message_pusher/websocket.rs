//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - コネクションの送信キューへのメッセージ投入
//! - ブロードキャスト時の送信失敗をコネクション単位で収集する
//!
//! ## 設計ノート
//!
//! WebSocket の生成と writer タスクは UI 層（`ui/handler/websocket.rs`）が担います。
//! この実装は Registry から渡された `Connection` の送信キューにだけ書き込みます。
//! 失敗したコネクションの後始末（leave と退出通知）は呼び出し側の Broadcaster が行います。

use async_trait::async_trait;

use crate::domain::{Connection, MessagePusher};

/// WebSocket を使った MessagePusher 実装
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn broadcast(&self, targets: Vec<Connection>, content: &str) -> Vec<Connection> {
        let mut failed = Vec::new();

        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match target.push(content) {
                Ok(()) => {
                    tracing::debug!("Broadcasted message to connection '{}'", target.id());
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to push message to '{}' ({}): {}",
                        target.owner(),
                        target.id(),
                        e
                    );
                    failed.push(target);
                }
            }
        }

        failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionIdFactory, ParticipantId};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - broadcast: 複数コネクションへの送信と、失敗したコネクションの収集
    //
    // 【どのようなシナリオをテストするか】
    // 1. broadcast の成功ケース
    // 2. broadcast の部分失敗ケース（writer が終了していても他のコネクションには届く）
    // 3. 空のターゲットリスト
    // ========================================

    fn connect(raw_id: &str) -> (Connection, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ParticipantId::new(raw_id.to_string()).unwrap();
        (Connection::new(ConnectionIdFactory::generate(), id, tx), rx)
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のコネクションにメッセージをブロードキャストできる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, mut rx1) = connect("alice");
        let (bob, mut rx2) = connect("bob");

        // when (操作):
        let failed = pusher.broadcast(vec![alice, bob], "Broadcast message").await;

        // then (期待する結果):
        assert!(failed.is_empty());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部のコネクションが失敗しても残りには届き、失敗したものだけが返る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (alice, mut rx1) = connect("alice");
        let (broken, broken_rx) = connect("broken");
        let (bob, mut rx2) = connect("bob");
        drop(broken_rx);

        // when (操作):
        let failed = pusher
            .broadcast(vec![alice, broken.clone(), bob], "Broadcast message")
            .await;

        // then (期待する結果):
        assert_eq!(failed, vec![broken]);
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let failed = pusher.broadcast(vec![], "Message").await;

        // then (期待する結果):
        assert!(failed.is_empty());
    }
}
