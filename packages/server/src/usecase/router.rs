//! UseCase: コマンドルーター
//!
//! 受信した 1 行を `Command` に解釈し、対応する UseCase を呼び出します。
//! 行をまたいで保持する状態は参加者 ID だけです。
//! 入力の誤りは本人への返信（`server::help`）としてだけ扱い、他の参加者には配信しません。

use std::sync::Arc;

use crate::domain::{ChatMessage, DisplayName, ParticipantId, RenameOutcome, ValidationError};

use super::{
    broadcast::{Broadcaster, DeliveryReport},
    command::Command,
    list_participants::ListParticipantsUseCase,
    rename_participant::RenameParticipantUseCase,
    send_message::SendMessageUseCase,
};

/// 1 行を処理した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// 本人にだけ返信した
    Replied(ChatMessage),
    /// 表示名を変更した
    Renamed(RenameOutcome),
    /// 発言を配信した
    Broadcast(DeliveryReport),
    /// 何もしなかった（送信者が既に Registry にいない）
    Dropped,
}

pub struct CommandRouter {
    broadcaster: Arc<Broadcaster>,
    send_message_usecase: Arc<SendMessageUseCase>,
    rename_participant_usecase: Arc<RenameParticipantUseCase>,
    list_participants_usecase: Arc<ListParticipantsUseCase>,
}

impl CommandRouter {
    pub fn new(
        broadcaster: Arc<Broadcaster>,
        send_message_usecase: Arc<SendMessageUseCase>,
        rename_participant_usecase: Arc<RenameParticipantUseCase>,
        list_participants_usecase: Arc<ListParticipantsUseCase>,
    ) -> Self {
        Self {
            broadcaster,
            send_message_usecase,
            rename_participant_usecase,
            list_participants_usecase,
        }
    }

    /// 参加者 `from` から受信した 1 行を処理する
    pub async fn handle(&self, from: &ParticipantId, line: &str) -> Dispatched {
        match Command::parse(line) {
            Command::Who => {
                let names = self.list_participants_usecase.names().await;
                self.reply(from, ChatMessage::who(&names)).await
            }
            Command::Rename(raw) => self.rename(from, &raw).await,
            Command::Help => self.reply(from, ChatMessage::help()).await,
            Command::Unknown(token) => {
                tracing::debug!("Unknown command '{}' from '{}'", token, from);
                self.reply(from, ChatMessage::unknown_command(&token)).await
            }
            Command::Chat(body) => {
                Dispatched::Broadcast(self.send_message_usecase.execute(from, body).await)
            }
        }
    }

    async fn rename(&self, from: &ParticipantId, raw: &str) -> Dispatched {
        let new_name = match DisplayName::new(raw) {
            Ok(name) => name,
            Err(ValidationError::EmptyName) => {
                return self.reply(from, ChatMessage::user_usage()).await;
            }
            Err(e) => {
                tracing::debug!("Rejected new name from '{}': {}", from, e);
                return self.reply(from, ChatMessage::error(e.to_string())).await;
            }
        };

        match self
            .rename_participant_usecase
            .execute(from, new_name)
            .await
        {
            Ok(outcome) => Dispatched::Renamed(outcome),
            Err(e) => {
                tracing::warn!("Failed to rename: {}", e);
                Dispatched::Dropped
            }
        }
    }

    async fn reply(&self, to: &ParticipantId, message: ChatMessage) -> Dispatched {
        self.broadcaster.send_to(to, &message).await;
        Dispatched::Replied(message)
    }
}
