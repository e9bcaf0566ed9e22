//! UseCase 層のテスト用ヘルパー

use std::{num::NonZeroUsize, sync::Arc};

use tokio::sync::mpsc;

use crate::{
    domain::{Connection, ConnectionIdFactory, ParticipantId},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryChatRoomRepository,
    },
};

use super::{
    Broadcaster, CommandRouter, ConnectParticipantUseCase, DisconnectParticipantUseCase,
    ListParticipantsUseCase, RenameParticipantUseCase, SendMessageUseCase,
};

/// テスト用に配線済みの UseCase 一式
pub(crate) struct TestChat {
    pub repository: Arc<InMemoryChatRoomRepository>,
    pub broadcaster: Arc<Broadcaster>,
    pub connect: ConnectParticipantUseCase,
    pub disconnect: DisconnectParticipantUseCase,
    pub router: CommandRouter,
}

impl TestChat {
    pub fn new(history_capacity: usize) -> Self {
        let repository = Arc::new(InMemoryChatRoomRepository::with_history_capacity(
            NonZeroUsize::new(history_capacity).unwrap(),
        ));
        let broadcaster = Arc::new(Broadcaster::new(
            repository.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        ));
        let router = CommandRouter::new(
            broadcaster.clone(),
            Arc::new(SendMessageUseCase::new(repository.clone(), broadcaster.clone())),
            Arc::new(RenameParticipantUseCase::new(
                repository.clone(),
                broadcaster.clone(),
            )),
            Arc::new(ListParticipantsUseCase::new(repository.clone())),
        );
        Self {
            connect: ConnectParticipantUseCase::new(repository.clone(), broadcaster.clone()),
            disconnect: DisconnectParticipantUseCase::new(broadcaster.clone()),
            repository,
            broadcaster,
            router,
        }
    }

    /// 新しいコネクションを作って join させる
    pub async fn join(&self, raw_id: &str) -> TestClient {
        let client = TestClient::new(raw_id);
        self.connect
            .execute(client.connection.clone())
            .await
            .unwrap();
        client
    }
}

/// テスト用のクライアント（コネクションと受信側チャンネル）
pub(crate) struct TestClient {
    pub id: ParticipantId,
    pub connection: Connection,
    pub rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    pub fn new(raw_id: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ParticipantId::new(raw_id.to_string()).unwrap();
        Self {
            connection: Connection::new(ConnectionIdFactory::generate(), id.clone(), tx),
            id,
            rx,
        }
    }

    /// これまでに届いた行をすべて取り出す
    pub fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    /// 受信側を閉じて、以降の送信を失敗させる
    pub fn break_connection(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}
