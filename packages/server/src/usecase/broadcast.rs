//! Broadcast dispatcher
//!
//! Fans a message out to every open connection of a room. The participant
//! set is snapshotted once per call and the message is serialized once.

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, Connection, RoomId, RoomRepository},
    infrastructure::dto::websocket::encode,
};

/// ルーム内の全参加者へのメッセージ配信
#[derive(Clone)]
pub struct Broadcaster {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl Broadcaster {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Deliver `message` to every open connection in the room.
    ///
    /// Closed connections are skipped and a failed send does not stop the
    /// fan-out. Returns the number of connections the message was queued on.
    pub async fn broadcast(&self, room_id: &RoomId, message: &ChatMessage) -> usize {
        let Some(room) = self.repository.get_room(room_id).await else {
            tracing::debug!(room_id = %room_id, "Broadcast to missing room dropped");
            return 0;
        };
        deliver(room_id, &room.connections(), message)
    }

    /// Broadcast the current roster of the room as a `USER_LIST` message
    pub async fn broadcast_user_list(&self, room_id: &RoomId) -> usize {
        let Some(room) = self.repository.get_room(room_id).await else {
            return 0;
        };
        let message = ChatMessage::user_list(&room.participant_usernames(), room_id);
        deliver(room_id, &room.connections(), &message)
    }

    /// Deliver `message` to a participant snapshot taken by the caller
    pub fn broadcast_to(
        &self,
        room_id: &RoomId,
        connections: &[Arc<dyn Connection>],
        message: &ChatMessage,
    ) -> usize {
        deliver(room_id, connections, message)
    }

    /// Deliver `message` to a single connection
    pub fn send_to(&self, connection: &dyn Connection, message: &ChatMessage) -> bool {
        let Some(payload) = serialize(message) else {
            return false;
        };
        match connection.send(payload) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(connection_id = %connection.id(), error = %e, "Failed to send private message");
                false
            }
        }
    }
}

fn deliver(room_id: &RoomId, connections: &[Arc<dyn Connection>], message: &ChatMessage) -> usize {
    let Some(payload) = serialize(message) else {
        return 0;
    };

    let mut delivered = 0;
    for connection in connections {
        if !connection.is_open() {
            continue;
        }
        match connection.send(payload.clone()) {
            Ok(()) => delivered += 1,
            Err(e) => {
                tracing::warn!(
                    room_id = %room_id,
                    connection_id = %connection.id(),
                    error = %e,
                    "Failed to deliver message"
                );
            }
        }
    }

    tracing::debug!(
        room_id = %room_id,
        kind = ?message.kind,
        delivered,
        participants = connections.len(),
        "Broadcasted message"
    );
    delivered
}

fn serialize(message: &ChatMessage) -> Option<Arc<str>> {
    match encode(message) {
        Ok(json) => Some(Arc::from(json)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ConnectionError, ConnectionId, MessageContent, MessageKind, RoomName, Username,
            connection::MockConnection,
        },
        infrastructure::{
            connection::ChannelConnection,
            dto::websocket::{ChatMessageDto, MessageType},
            repository::InMemoryRoomRepository,
        },
    };
    use tokio::sync::mpsc;

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    async fn room_with_host(repository: &Arc<InMemoryRoomRepository>) -> RoomId {
        repository
            .create_room(RoomName::new("Trivia".to_string()).unwrap(), username("alice"))
            .await
            .unwrap()
    }

    async fn join(
        repository: &Arc<InMemoryRoomRepository>,
        room_id: &RoomId,
        name: &str,
    ) -> mpsc::Receiver<Arc<str>> {
        let (connection, rx) = ChannelConnection::new(16);
        repository
            .add_participant(room_id, username(name), Arc::new(connection))
            .await
            .unwrap();
        rx
    }

    fn chat(room_id: &RoomId, text: &str) -> ChatMessage {
        ChatMessage::new(
            MessageKind::Chat,
            MessageContent::new(text.to_string()).unwrap(),
            username("alice"),
            room_id.clone(),
        )
    }

    fn decode(payload: &str) -> ChatMessageDto {
        serde_json::from_str(payload).unwrap()
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_participant_and_no_one_else() {
        // テスト項目: ルームの全参加者に届き、他のルームには届かない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = room_with_host(&repository).await;
        let other_room = room_with_host(&repository).await;
        let mut alice_rx = join(&repository, &room_id, "alice").await;
        let mut bob_rx = join(&repository, &room_id, "bob").await;
        let mut carol_rx = join(&repository, &room_id, "carol").await;
        let mut outsider_rx = join(&repository, &other_room, "dave").await;
        let broadcaster = Broadcaster::new(repository.clone());

        // when (操作):
        let delivered = broadcaster.broadcast(&room_id, &chat(&room_id, "hello")).await;

        // then (期待する結果):
        assert_eq!(delivered, 3);
        for rx in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
            let dto = decode(&rx.recv().await.unwrap());
            assert_eq!(dto.r#type, MessageType::Chat);
            assert_eq!(dto.content, "hello");
        }
        assert!(outsider_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_to_missing_room_is_noop() {
        // テスト項目: 存在しないルームへの配信は何もしない
        let repository = Arc::new(InMemoryRoomRepository::new());
        let broadcaster = Broadcaster::new(repository);
        let room_id = RoomId::new("R9".to_string()).unwrap();

        let delivered = broadcaster.broadcast(&room_id, &chat(&room_id, "hello")).await;

        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_broadcast_skips_closed_and_survives_failures() {
        // テスト項目: 閉じた接続はスキップされ、送信失敗があっても他への配信は続く
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = room_with_host(&repository).await;

        let mut closed = MockConnection::new();
        closed
            .expect_id()
            .return_const(ConnectionId::from_uuid(uuid::Uuid::new_v4()));
        closed.expect_is_open().return_const(false);
        closed.expect_send().times(0);

        let mut failing = MockConnection::new();
        failing
            .expect_id()
            .return_const(ConnectionId::from_uuid(uuid::Uuid::new_v4()));
        failing.expect_is_open().return_const(true);
        failing
            .expect_send()
            .times(1)
            .returning(|_| Err(ConnectionError::Backpressure));

        let mut healthy = MockConnection::new();
        healthy
            .expect_id()
            .return_const(ConnectionId::from_uuid(uuid::Uuid::new_v4()));
        healthy.expect_is_open().return_const(true);
        healthy.expect_send().times(1).returning(|_| Ok(()));

        for (name, connection) in [("closed", closed), ("failing", failing), ("healthy", healthy)] {
            repository
                .add_participant(&room_id, username(name), Arc::new(connection))
                .await
                .unwrap();
        }
        let broadcaster = Broadcaster::new(repository.clone());

        // when (操作):
        let delivered = broadcaster.broadcast(&room_id, &chat(&room_id, "hello")).await;

        // then (期待する結果):
        assert_eq!(delivered, 1);
    }

    #[tokio::test]
    async fn test_broadcast_user_list() {
        // テスト項目: USER_LIST は System から現在の参加者名一覧を含む
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = room_with_host(&repository).await;
        let mut bob_rx = join(&repository, &room_id, "bob").await;
        let _alice_rx = join(&repository, &room_id, "alice").await;
        let broadcaster = Broadcaster::new(repository.clone());

        // when (操作):
        let delivered = broadcaster.broadcast_user_list(&room_id).await;

        // then (期待する結果):
        assert_eq!(delivered, 2);
        let dto = decode(&bob_rx.recv().await.unwrap());
        assert_eq!(dto.r#type, MessageType::UserList);
        assert_eq!(dto.sender, "System");
        assert_eq!(dto.content, "alice, bob");
        assert_eq!(dto.room_id, room_id.as_str());
    }

    #[tokio::test]
    async fn test_send_to_single_connection() {
        // テスト項目: 個別送信は指定した接続にのみ届く
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let broadcaster = Broadcaster::new(repository);
        let (connection, mut rx) = ChannelConnection::new(4);
        let room_id = RoomId::new("R9".to_string()).unwrap();

        // when (操作):
        let sent = broadcaster.send_to(
            &connection,
            &ChatMessage::system_notice("Room not found or inactive", &room_id),
        );

        // then (期待する結果):
        assert!(sent);
        let dto = decode(&rx.recv().await.unwrap());
        assert_eq!(dto.r#type, MessageType::Chat);
        assert_eq!(dto.sender, "System");
    }
}
