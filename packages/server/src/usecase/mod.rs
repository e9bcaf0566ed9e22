//! UseCase 層
//!
//! Registry（Repository）と Broadcaster を組み合わせて、
//! 参加・退出・改名・発言・コマンド処理を実装します。

mod broadcast;
mod command;
mod connect_participant;
mod disconnect_participant;
mod error;
mod list_participants;
mod rename_participant;
mod router;
mod send_message;

pub use broadcast::{Broadcaster, DeliveryReport};
pub use command::Command;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ConnectError;
pub use list_participants::ListParticipantsUseCase;
pub use rename_participant::RenameParticipantUseCase;
pub use router::{CommandRouter, Dispatched};
pub use send_message::SendMessageUseCase;

#[cfg(test)]
pub(crate) mod test_support;
