//! Repository trait 定義
//!
//! ドメイン層が必要とする Registry（参加者・コネクション・履歴）へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! 各メソッドは 1 回の呼び出しが 1 つの不可分な操作として振る舞う必要があります。
//! 配信先のスナップショット（`all_connections` / `connections_of` / `record_chat`）は、
//! join / leave / rename の途中状態から計算されてはいけません。

use async_trait::async_trait;

use super::{
    ChatMessage, Connection, ConnectionId, DisplayName, JoinOutcome, LeaveOutcome,
    MessagePushError, Participant, ParticipantId, RenameError, RenameOutcome,
};

/// ChatRoom Repository trait
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// コネクションを登録し、履歴をそのコネクションへ replay する
    ///
    /// replay は登録と同じ不可分操作の中で送信キューに積まれるため、
    /// 以降に配信されたメッセージが replay を追い越すことはない。
    async fn join(&self, connection: Connection) -> Result<JoinOutcome, MessagePushError>;

    /// コネクションの登録を解除
    async fn leave(&self, id: &ParticipantId, connection_id: &ConnectionId) -> LeaveOutcome;

    /// 表示名を変更
    async fn rename(
        &self,
        id: &ParticipantId,
        new_name: DisplayName,
    ) -> Result<RenameOutcome, RenameError>;

    /// 表示名を取得（未知の ID の場合は ID そのもの）
    async fn display_name_of(&self, id: &ParticipantId) -> String;

    /// 参加者のコネクション一覧（未知の ID の場合は空）
    async fn connections_of(&self, id: &ParticipantId) -> Vec<Connection>;

    /// 全コネクション一覧
    async fn all_connections(&self) -> Vec<Connection>;

    /// 参加者の表示名一覧（名前順）
    async fn participant_names(&self) -> Vec<String>;

    /// 参加者一覧（表示名順）
    async fn participants(&self) -> Vec<Participant>;

    /// 参加者数を取得
    async fn count_participants(&self) -> usize;

    /// 発言を履歴に追加し、その時点の全コネクションを配信先として返す
    async fn record_chat(&self, id: &ParticipantId, body: String)
    -> (ChatMessage, Vec<Connection>);
}
