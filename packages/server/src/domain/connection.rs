//! コネクション（クライアントへ送信できる物理セッションのハンドル）
//!
//! コネクションの実体（WebSocket）はトランスポート層が所有し、
//! ドメイン層は送信用チャンネルだけを参照します。
//! 送信はチャンネルへの enqueue なので、どのタスクから呼んでも安全で、
//! 同じコネクションへの送信は投入順に書き出されます。

use std::{
    borrow::Borrow,
    hash::{Hash, Hasher},
};

use tokio::sync::mpsc;

use super::{
    error::MessagePushError,
    value_object::{ConnectionId, ParticipantId},
};

/// クライアントの writer タスクへメッセージを渡すチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// コネクションハンドル
///
/// 等価性とハッシュは `id` のみで決まる。
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    owner: ParticipantId,
    channel: PusherChannel,
}

impl Connection {
    pub fn new(id: ConnectionId, owner: ParticipantId, channel: PusherChannel) -> Self {
        Self { id, owner, channel }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// このコネクションを所有する参加者
    pub fn owner(&self) -> &ParticipantId {
        &self.owner
    }

    /// 1 行を送信キューに積む
    ///
    /// writer タスクが既に終了している場合は `ConnectionClosed` を返す。
    pub fn push(&self, line: &str) -> Result<(), MessagePushError> {
        self.channel
            .send(line.to_string())
            .map_err(|_| MessagePushError::ConnectionClosed(self.id))
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Connection {}

impl Hash for Connection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Borrow<ConnectionId> for Connection {
    fn borrow(&self) -> &ConnectionId {
        &self.id
    }
}
