//! ChatRoom 集約
//!
//! 参加者 ID → 参加者（表示名・コネクション集合）の対応と発言履歴を保持する。
//! すべての操作は同期的な状態遷移で、排他制御は Repository 実装が担う。

use std::{collections::HashMap, num::NonZeroUsize};

use super::{
    connection::Connection,
    entity::{ChatMessage, Participant},
    error::{MessagePushError, RenameError},
    history::HistoryBuffer,
    value_object::{ConnectionId, DisplayName, ParticipantId, Timestamp},
};

/// join の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// 参加者の現在の表示名
    pub display_name: DisplayName,
    /// この join で参加者が新規作成されたか（参加通知はこのときだけ行う）
    pub created: bool,
    /// replay したエントリ数
    pub replayed: usize,
}

/// leave の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// 最後のコネクションが外れ、参加者が削除された
    Left { display_name: DisplayName },
    /// 同じ参加者の別のコネクションがまだ残っている
    StillConnected { remaining: usize },
    /// コネクションが登録されていなかった
    NotFound,
}

/// rename の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub previous: DisplayName,
    pub current: DisplayName,
}

#[derive(Debug)]
pub struct ChatRoom {
    participants: HashMap<ParticipantId, Participant>,
    history: HistoryBuffer,
    /// これまでに作成した参加者の数（既定の表示名の通し番号）
    members_created: u64,
}

impl ChatRoom {
    pub fn new(history_capacity: NonZeroUsize) -> Self {
        Self {
            participants: HashMap::new(),
            history: HistoryBuffer::new(history_capacity),
            members_created: 0,
        }
    }

    /// コネクションを参加者に追加し、履歴をそのコネクションへ replay する
    ///
    /// 未知の ID なら通し番号の既定の表示名（`user1`, `user2`, ...）で参加者を作成する。
    /// replay は登録より先に行うので、replay に失敗したコネクションは登録されない。
    pub fn join(
        &mut self,
        connection: Connection,
        now: Timestamp,
    ) -> Result<JoinOutcome, MessagePushError> {
        let id = connection.owner().clone();
        let created = !self.participants.contains_key(&id);

        let replayed = self.history.replay(&connection)?;

        let members_created = &mut self.members_created;
        let participant = self.participants.entry(id.clone()).or_insert_with(|| {
            *members_created += 1;
            Participant::new(id, DisplayName::numbered(*members_created), now)
        });
        participant.connections.insert(connection);

        Ok(JoinOutcome {
            display_name: participant.display_name.clone(),
            created,
            replayed,
        })
    }

    /// コネクションを参加者から外す。最後のコネクションなら参加者を削除する
    pub fn leave(&mut self, id: &ParticipantId, connection_id: &ConnectionId) -> LeaveOutcome {
        let Some(participant) = self.participants.get_mut(id) else {
            return LeaveOutcome::NotFound;
        };
        if !participant.connections.remove(connection_id) {
            return LeaveOutcome::NotFound;
        }
        if !participant.connections.is_empty() {
            return LeaveOutcome::StillConnected {
                remaining: participant.connections.len(),
            };
        }

        match self.participants.remove(id) {
            Some(participant) => LeaveOutcome::Left {
                display_name: participant.display_name,
            },
            None => LeaveOutcome::NotFound,
        }
    }

    pub fn rename(
        &mut self,
        id: &ParticipantId,
        new_name: DisplayName,
    ) -> Result<RenameOutcome, RenameError> {
        let participant = self
            .participants
            .get_mut(id)
            .ok_or_else(|| RenameError::ParticipantNotFound(id.as_str().to_string()))?;
        let previous = std::mem::replace(&mut participant.display_name, new_name);
        Ok(RenameOutcome {
            previous,
            current: participant.display_name.clone(),
        })
    }

    /// 表示名を取得する。未知の ID の場合は ID そのものを返す
    pub fn display_name_of(&self, id: &ParticipantId) -> String {
        self.participants
            .get(id)
            .map(|p| p.display_name.as_str().to_string())
            .unwrap_or_else(|| id.as_str().to_string())
    }

    pub fn connections_of(&self, id: &ParticipantId) -> Vec<Connection> {
        self.participants
            .get(id)
            .map(|p| p.connections.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn all_connections(&self) -> Vec<Connection> {
        self.participants
            .values()
            .flat_map(|p| p.connections.iter().cloned())
            .collect()
    }

    /// 参加者の表示名一覧（名前順）
    pub fn participant_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .participants
            .values()
            .map(|p| p.display_name.as_str().to_string())
            .collect();
        names.sort();
        names
    }

    /// 参加者一覧（表示名順）
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        participants
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// 発言を履歴に追加し、その時点の全コネクションを配信先として返す
    pub fn record_chat(
        &mut self,
        id: &ParticipantId,
        body: String,
    ) -> (ChatMessage, Vec<Connection>) {
        let message = ChatMessage::chat(self.display_name_of(id), body);
        self.history.push(message.clone());
        (message, self.all_connections())
    }

    #[cfg(test)]
    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }
}
