//! UseCase: メッセージ配信（Broadcaster）
//!
//! 配信先（全員・特定の参加者・本人以外）を Registry のスナップショットから決定し、
//! MessagePusher を使って送信します。
//!
//! ## 送信失敗の扱い
//!
//! 送信に失敗したコネクションは切断済みとみなして Registry から外します（暗黙の leave）。
//! それで参加者がいなくなった場合は退出通知を配信し、その配信での失敗も同じように処理します。
//! 連鎖はキューで処理するので再帰しません。失敗が呼び出し元に伝播することはありません。

use std::{collections::VecDeque, sync::Arc};

use crate::domain::{
    ChatMessage, ChatRoomRepository, Connection, DisplayName, LeaveOutcome, MessagePusher,
    ParticipantId,
};

/// 1 回の配信の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryReport {
    /// 送信キューに積めたコネクション数
    pub delivered: usize,
    /// 送信に失敗し、Registry から外したコネクション数
    pub failed: usize,
}

pub struct Broadcaster {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl Broadcaster {
    pub fn new(
        repository: Arc<dyn ChatRoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 呼び出し時点で登録されている全コネクションへ配信
    pub async fn send_to_all(&self, message: &ChatMessage) -> DeliveryReport {
        let targets = self.repository.all_connections().await;
        self.deliver(targets, message).await
    }

    /// 参加者のすべてのコネクションへ配信（本人宛ての返信）
    ///
    /// コネクションがない場合は何もしない。
    pub async fn send_to(&self, id: &ParticipantId, message: &ChatMessage) -> DeliveryReport {
        let targets = self.repository.connections_of(id).await;
        if targets.is_empty() {
            tracing::debug!("No connections for '{}', skipping private reply", id);
            return DeliveryReport::default();
        }
        self.deliver(targets, message).await
    }

    /// 指定した参加者以外の全コネクションへ配信
    ///
    /// 退出通知も同じ配信先（退出した本人以外）に送られる。
    pub async fn send_to_others(
        &self,
        exclude: &ParticipantId,
        message: &ChatMessage,
    ) -> DeliveryReport {
        let targets = self.connections_except(exclude).await;
        self.deliver(targets, message).await
    }

    async fn connections_except(&self, exclude: &ParticipantId) -> Vec<Connection> {
        self.repository
            .all_connections()
            .await
            .into_iter()
            .filter(|connection| connection.owner() != exclude)
            .collect()
    }

    /// 配信先が決まっているメッセージを送信する
    ///
    /// 失敗したコネクションは Registry から外される。
    pub async fn deliver(&self, targets: Vec<Connection>, message: &ChatMessage) -> DeliveryReport {
        let total = targets.len();
        let failed = self
            .message_pusher
            .broadcast(targets, &message.render())
            .await;
        let report = DeliveryReport {
            delivered: total - failed.len(),
            failed: failed.len(),
        };
        if !failed.is_empty() {
            self.evict(failed).await;
        }
        report
    }

    /// コネクションを Registry から外し、参加者がいなくなった場合は退出通知を配信する
    pub async fn remove_connection(&self, connection: &Connection) -> LeaveOutcome {
        let outcome = self
            .repository
            .leave(connection.owner(), &connection.id())
            .await;
        if let LeaveOutcome::Left { display_name } = &outcome {
            let failed = self
                .announce_departure(connection.owner(), display_name)
                .await;
            self.evict(failed).await;
        }
        outcome
    }

    /// 退出通知を本人以外の全員へ送り、送信に失敗したコネクションを返す
    ///
    /// leave の直後に同じ ID で再接続したコネクションには、自分の退出通知は届かない。
    async fn announce_departure(
        &self,
        departed: &ParticipantId,
        display_name: &DisplayName,
    ) -> Vec<Connection> {
        tracing::info!("Broadcasting member-left for '{}'", display_name);
        let notice = ChatMessage::member_left(display_name);
        let targets = self.connections_except(departed).await;
        self.message_pusher
            .broadcast(targets, &notice.render())
            .await
    }

    /// 送信に失敗したコネクションを切断済みとして処理する
    async fn evict(&self, failed: Vec<Connection>) {
        let mut pending: VecDeque<Connection> = failed.into();

        while let Some(connection) = pending.pop_front() {
            let outcome = self
                .repository
                .leave(connection.owner(), &connection.id())
                .await;
            tracing::info!(
                "Evicted connection '{}' of '{}' after delivery failure: {:?}",
                connection.id(),
                connection.owner(),
                outcome
            );
            if let LeaveOutcome::Left { display_name } = outcome {
                pending.extend(self.announce_departure(connection.owner(), &display_name).await);
            }
        }
    }
}
