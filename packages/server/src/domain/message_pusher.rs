//! MessagePusher trait 定義
//!
//! コネクションへのメッセージ送信（通知）の抽象化。
//! 送信の失敗はコネクション単位で扱い、ブロードキャスト全体を中断しない。

use async_trait::async_trait;

use super::Connection;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 複数のコネクションへ送信（1 つのコネクションへの送信も 1 要素の配信として扱う）
    ///
    /// 各コネクションへの送信は独立して行われ、送信に失敗したコネクションを返す。
    async fn broadcast(&self, targets: Vec<Connection>, content: &str) -> Vec<Connection>;
}
