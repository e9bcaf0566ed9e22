//! エンティティ
//!
//! - `Participant`: 参加者（ID・表示名・接続中のコネクション集合）
//! - `ChatMessage`: 配信されるメッセージ（ワイヤ形式 `sender::kind::body` に変換される）

use std::{collections::HashSet, fmt};

use super::{
    connection::Connection,
    value_object::{DisplayName, ParticipantId, Timestamp},
};

/// サーバー発のメッセージの送信者名
pub const SERVER_SENDER_NAME: &str = "server";

/// `/user` の使い方
pub const USER_COMMAND_USAGE: &str = "/user [newName]";

/// `/help` の返信本文
pub const HELP_TEXT: &str = "Commands: /user [newName], /who, /help";

/// 参加者
///
/// Registry に存在する間、`connections` は空にならない。
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: DisplayName,
    pub connections: HashSet<Connection>,
    pub joined_at: Timestamp,
}

impl Participant {
    /// 空のコネクション集合で参加者を作成
    pub fn new(id: ParticipantId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            connections: HashSet::new(),
            joined_at,
        }
    }
}

/// メッセージ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Chat,
    Join,
    Leave,
    Rename,
    Who,
    Help,
    Error,
}

impl MessageKind {
    /// ワイヤ上の種別表記
    ///
    /// 参加・退出・改名は `server::notice`、本人宛ての返信は `server::help`。
    pub fn wire_kind(self) -> &'static str {
        match self {
            MessageKind::Chat => "chat",
            MessageKind::Join | MessageKind::Leave | MessageKind::Rename => "server::notice",
            MessageKind::Who | MessageKind::Help | MessageKind::Error => "server::help",
        }
    }
}

/// 配信メッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub sender_name: String,
    pub body: String,
}

impl ChatMessage {
    fn from_server(kind: MessageKind, body: String) -> Self {
        Self {
            kind,
            sender_name: SERVER_SENDER_NAME.to_string(),
            body,
        }
    }

    /// 参加者の発言
    pub fn chat(sender_name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Chat,
            sender_name: sender_name.into(),
            body: body.into(),
        }
    }

    pub fn member_joined(name: &DisplayName) -> Self {
        Self::from_server(MessageKind::Join, format!("Member joined: {}.", name))
    }

    pub fn member_left(name: &DisplayName) -> Self {
        Self::from_server(MessageKind::Leave, format!("Member left: {}.", name))
    }

    pub fn member_renamed(previous: &DisplayName, current: &DisplayName) -> Self {
        Self::from_server(
            MessageKind::Rename,
            format!("Member renamed from {} to {}", previous, current),
        )
    }

    /// `/who` の返信（表示名をカンマ区切りで列挙）
    pub fn who(names: &[String]) -> Self {
        Self::from_server(MessageKind::Who, format!("Members: {}", names.join(", ")))
    }

    pub fn help() -> Self {
        Self::from_server(MessageKind::Help, HELP_TEXT.to_string())
    }

    /// `/user` に名前が指定されなかった場合の返信
    pub fn user_usage() -> Self {
        Self::from_server(MessageKind::Help, USER_COMMAND_USAGE.to_string())
    }

    pub fn unknown_command(token: &str) -> Self {
        Self::from_server(MessageKind::Error, format!("Unknown command {}", token))
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self::from_server(MessageKind::Error, body.into())
    }

    /// ワイヤ形式 `sender::kind::body` に変換
    pub fn render(&self) -> String {
        format!(
            "{}::{}::{}",
            self.sender_name,
            self.kind.wire_kind(),
            self.body
        )
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_chat_message() {
        // テスト項目: 発言は `name::chat::body` 形式で出力される
        // given (前提条件):
        let message = ChatMessage::chat("alice", "hello");

        // when (操作):
        let line = message.render();

        // then (期待する結果):
        assert_eq!(line, "alice::chat::hello");
    }

    #[test]
    fn test_render_server_notice() {
        // テスト項目: 参加通知は server::server::notice として出力される
        // given (前提条件):
        let name = DisplayName::new("alice").unwrap();

        // when (操作):
        let line = ChatMessage::member_joined(&name).render();

        // then (期待する結果):
        assert_eq!(line, "server::server::notice::Member joined: alice.");
    }

    #[test]
    fn test_render_rename_notice_contains_both_names() {
        // テスト項目: 改名通知には旧名と新名の両方が含まれる
        // given (前提条件):
        let previous = DisplayName::new("user-abc").unwrap();
        let current = DisplayName::new("alice").unwrap();

        // when (操作):
        let message = ChatMessage::member_renamed(&previous, &current);

        // then (期待する結果):
        assert_eq!(message.kind, MessageKind::Rename);
        assert_eq!(
            message.render(),
            "server::server::notice::Member renamed from user-abc to alice"
        );
    }

    #[test]
    fn test_private_replies_use_help_kind() {
        // テスト項目: 本人宛ての返信（who / help / error）はすべて server::help になる
        // given (前提条件):
        let replies = [
            ChatMessage::who(&["alice".to_string(), "bob".to_string()]),
            ChatMessage::help(),
            ChatMessage::user_usage(),
            ChatMessage::unknown_command("/foo"),
        ];

        // when (操作):
        let lines: Vec<String> = replies.iter().map(ChatMessage::render).collect();

        // then (期待する結果):
        assert_eq!(lines[0], "server::server::help::Members: alice, bob");
        assert_eq!(lines[1], format!("server::server::help::{}", HELP_TEXT));
        assert_eq!(lines[2], "server::server::help::/user [newName]");
        assert_eq!(lines[3], "server::server::help::Unknown command /foo");
    }

    #[test]
    fn test_new_participant_has_no_connections() {
        // テスト項目: 新規参加者は与えられた表示名と空のコネクション集合を持つ
        // given (前提条件):
        let id = ParticipantId::new("0123456789".to_string()).unwrap();

        // when (操作):
        let participant = Participant::new(id, DisplayName::numbered(1), Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(participant.display_name.as_str(), "user1");
        assert!(participant.connections.is_empty());
        assert_eq!(participant.joined_at.value(), 1000);
    }
}
