//! ドメイン層
//!
//! 値オブジェクト・エンティティ・集約（`ChatRoom`）と、
//! ドメイン層が必要とするインターフェース（Repository / MessagePusher）を定義します。

pub mod chat_room;
pub mod connection;
pub mod entity;
pub mod error;
pub mod history;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use chat_room::{ChatRoom, JoinOutcome, LeaveOutcome, RenameOutcome};
pub use connection::{Connection, PusherChannel};
pub use entity::{ChatMessage, MessageKind, Participant, SERVER_SENDER_NAME};
pub use error::{MessagePushError, RenameError, ValidationError};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
pub use message_pusher::MessagePusher;
pub use repository::ChatRoomRepository;
pub use value_object::{
    ConnectionId, ConnectionIdFactory, DisplayName, MAX_DISPLAY_NAME_CHARS, ParticipantId,
    Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
