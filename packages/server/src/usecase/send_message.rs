//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - メッセージが送信者を含むルームの全参加者にそのまま届くことを保証
//! - 存在しないルーム宛てのメッセージが黙って捨てられることを保証

use std::sync::Arc;

use crate::domain::{ChatMessage, RoomRepository};

use super::broadcast::Broadcaster;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl SendMessageUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        let broadcaster = Broadcaster::new(repository.clone());
        Self {
            repository,
            broadcaster,
        }
    }

    /// Relay `message` verbatim to its room. Returns the delivery count.
    pub async fn execute(&self, message: &ChatMessage) -> usize {
        if !self.repository.room_exists(&message.room_id).await {
            tracing::debug!(room_id = %message.room_id, sender = %message.sender, "Message for missing room dropped");
            return 0;
        }
        self.broadcaster.broadcast(&message.room_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessageContent, MessageKind, RoomId, RoomName, Username},
        infrastructure::{
            connection::ChannelConnection, dto::websocket::ChatMessageDto,
            repository::InMemoryRoomRepository,
        },
    };

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn chat(sender: &str, room_id: &RoomId, text: &str) -> ChatMessage {
        ChatMessage::with_timestamp(
            MessageKind::Chat,
            MessageContent::new(text.to_string()).unwrap(),
            username(sender),
            room_id.clone(),
            Some("2026-10-18 12:00:00".to_string()),
        )
    }

    #[tokio::test]
    async fn test_send_message_reaches_sender_too() {
        // テスト項目: 送信者自身を含む全参加者に同一内容で届く
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = repository
            .create_room(RoomName::new("Trivia".to_string()).unwrap(), username("alice"))
            .await
            .unwrap();
        let mut receivers = Vec::new();
        for name in ["alice", "bob"] {
            let (connection, rx) = ChannelConnection::new(16);
            repository
                .add_participant(&room_id, username(name), Arc::new(connection))
                .await
                .unwrap();
            receivers.push(rx);
        }
        let usecase = SendMessageUseCase::new(repository.clone());

        // when (操作):
        let delivered = usecase.execute(&chat("bob", &room_id, "hi")).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        for rx in receivers.iter_mut() {
            let dto: ChatMessageDto = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(dto.content, "hi");
            assert_eq!(dto.sender, "bob");
            assert_eq!(dto.timestamp.as_deref(), Some("2026-10-18 12:00:00"));
        }
    }

    #[tokio::test]
    async fn test_send_message_to_missing_room_is_dropped() {
        // テスト項目: 存在しないルーム宛てのメッセージは誰にも届かない
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = SendMessageUseCase::new(repository);
        let room_id = RoomId::new("R9".to_string()).unwrap();

        let delivered = usecase.execute(&chat("bob", &room_id, "hi")).await;

        assert_eq!(delivered, 0);
    }
}
