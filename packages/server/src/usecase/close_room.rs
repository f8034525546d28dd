//! UseCase: ホストによるルーム終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CloseRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - ROOM_CLOSED が削除前に全参加者へ届くことを保証
//! - ホスト以外の要求ではルームが変化しないことを保証

use std::sync::Arc;

use crate::domain::{ChatMessage, RoomId, RoomRepository, Username};

use super::broadcast::Broadcaster;

/// ルーム終了のユースケース
pub struct CloseRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    broadcaster: Broadcaster,
}

impl CloseRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        let broadcaster = Broadcaster::new(repository.clone());
        Self {
            repository,
            broadcaster,
        }
    }

    /// 終了を実行
    ///
    /// Returns `false` without side effects unless `requester` is the host
    /// of a live room. The participant set is frozen before `ROOM_CLOSED` is
    /// sent, so nobody can join between the notice and the removal.
    pub async fn execute(&self, requester: &Username, room_id: &RoomId) -> bool {
        if !self.repository.is_host(requester, room_id).await {
            tracing::debug!(room_id = %room_id, requester = %requester, "Close request from non-host ignored");
            return false;
        }

        let Some(participants) = self.repository.begin_close(room_id).await else {
            tracing::debug!(room_id = %room_id, "Room already closing");
            return false;
        };

        // Participants must see the notice before their bindings are released
        let notified = self.broadcaster.broadcast_to(
            room_id,
            &participants,
            &ChatMessage::room_closed(room_id),
        );
        // Already gone if the last participant left meanwhile
        self.repository.close_room(room_id).await;

        tracing::info!(room_id = %room_id, host = %requester, notified, "Room closed by host");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Connection, ConnectionId, RepositoryError, Room, RoomName},
        infrastructure::{
            connection::ChannelConnection,
            dto::websocket::{ChatMessageDto, MessageType},
            repository::InMemoryRoomRepository,
        },
    };
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Registry that lets other users join around the two phases of a close
    struct InterleavingRepository {
        inner: Arc<InMemoryRoomRepository>,
        before_freeze: Arc<dyn Connection>,
        before_removal: Arc<dyn Connection>,
        late_join: Mutex<Option<Result<(), RepositoryError>>>,
    }

    #[async_trait]
    impl RoomRepository for InterleavingRepository {
        async fn create_room(
            &self,
            name: RoomName,
            host: Username,
        ) -> Result<RoomId, RepositoryError> {
            self.inner.create_room(name, host).await
        }

        async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
            self.inner.get_room(room_id).await
        }

        async fn room_exists(&self, room_id: &RoomId) -> bool {
            self.inner.room_exists(room_id).await
        }

        async fn add_participant(
            &self,
            room_id: &RoomId,
            username: Username,
            connection: Arc<dyn Connection>,
        ) -> Result<(), RepositoryError> {
            self.inner.add_participant(room_id, username, connection).await
        }

        async fn remove_participant(
            &self,
            username: &Username,
            connection_id: &ConnectionId,
        ) -> Option<RoomId> {
            self.inner.remove_participant(username, connection_id).await
        }

        async fn room_id_of(&self, username: &Username) -> Option<RoomId> {
            self.inner.room_id_of(username).await
        }

        async fn begin_close(&self, room_id: &RoomId) -> Option<Vec<Arc<dyn Connection>>> {
            self.inner
                .add_participant(room_id, username("carol"), self.before_freeze.clone())
                .await
                .unwrap();
            self.inner.begin_close(room_id).await
        }

        async fn close_room(&self, room_id: &RoomId) -> bool {
            let result = self
                .inner
                .add_participant(room_id, username("dave"), self.before_removal.clone())
                .await;
            *self.late_join.lock().unwrap() = Some(result);
            self.inner.close_room(room_id).await
        }

        async fn is_host(&self, username: &Username, room_id: &RoomId) -> bool {
            self.inner.is_host(username, room_id).await
        }

        async fn count_rooms(&self) -> usize {
            self.inner.count_rooms().await
        }
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
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

    async fn setup() -> (Arc<InMemoryRoomRepository>, RoomId) {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let room_id = repository
            .create_room(RoomName::new("Trivia".to_string()).unwrap(), username("alice"))
            .await
            .unwrap();
        (repository, room_id)
    }

    #[tokio::test]
    async fn test_host_closes_room() {
        // テスト項目: ホストが終了すると全員に ROOM_CLOSED が届き、ルームと束縛が消える
        // given (前提条件):
        let (repository, room_id) = setup().await;
        let mut alice_rx = join(&repository, &room_id, "alice").await;
        let mut bob_rx = join(&repository, &room_id, "bob").await;
        let usecase = CloseRoomUseCase::new(repository.clone());

        // when (操作):
        let closed = usecase.execute(&username("alice"), &room_id).await;

        // then (期待する結果):
        assert!(closed);
        for rx in [&mut alice_rx, &mut bob_rx] {
            let dto: ChatMessageDto = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(dto.r#type, MessageType::RoomClosed);
            assert_eq!(dto.sender, "System");
            assert_eq!(dto.content, "Room has been closed by the host");
            assert!(rx.try_recv().is_err());
        }
        assert!(!repository.room_exists(&room_id).await);
        assert_eq!(repository.room_id_of(&username("alice")).await, None);
        assert_eq!(repository.room_id_of(&username("bob")).await, None);
    }

    #[tokio::test]
    async fn test_non_host_cannot_close_room() {
        // テスト項目: ホスト以外の終了要求は無視され、誰にも通知されない
        // given (前提条件):
        let (repository, room_id) = setup().await;
        let mut alice_rx = join(&repository, &room_id, "alice").await;
        let mut bob_rx = join(&repository, &room_id, "bob").await;
        let usecase = CloseRoomUseCase::new(repository.clone());

        // when (操作):
        let closed = usecase.execute(&username("bob"), &room_id).await;

        // then (期待する結果):
        assert!(!closed);
        assert!(alice_rx.try_recv().is_err());
        assert!(bob_rx.try_recv().is_err());
        assert!(repository.room_exists(&room_id).await);
        assert_eq!(repository.get_room(&room_id).await.unwrap().participant_count(), 2);
    }

    #[tokio::test]
    async fn test_joins_racing_a_close_never_outlive_it() {
        // テスト項目: 終了処理と並行した参加者も ROOM_CLOSED を受け取るか、参加自体が拒否される
        // given (前提条件):
        let (inner, room_id) = setup().await;
        let mut alice_rx = join(&inner, &room_id, "alice").await;
        let (carol, mut carol_rx) = ChannelConnection::new(16);
        let (dave, mut dave_rx) = ChannelConnection::new(16);
        let repository = Arc::new(InterleavingRepository {
            inner: inner.clone(),
            before_freeze: Arc::new(carol),
            before_removal: Arc::new(dave),
            late_join: Mutex::new(None),
        });
        let usecase = CloseRoomUseCase::new(repository.clone());

        // when (操作):
        let closed = usecase.execute(&username("alice"), &room_id).await;

        // then (期待する結果):
        assert!(closed);
        for rx in [&mut alice_rx, &mut carol_rx] {
            let dto: ChatMessageDto = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(dto.r#type, MessageType::RoomClosed);
            assert!(rx.try_recv().is_err());
        }
        assert_eq!(
            repository.late_join.lock().unwrap().clone(),
            Some(Err(RepositoryError::RoomNotFound(room_id.clone())))
        );
        assert!(dave_rx.try_recv().is_err());
        assert_eq!(inner.room_id_of(&username("carol")).await, None);
        assert_eq!(inner.room_id_of(&username("dave")).await, None);
        assert_eq!(inner.count_rooms().await, 0);
    }

    #[tokio::test]
    async fn test_close_twice_notifies_once() {
        // テスト項目: 二度目の終了要求は false で、ROOM_CLOSED は一度だけ届く
        let (repository, room_id) = setup().await;
        let mut alice_rx = join(&repository, &room_id, "alice").await;
        let usecase = CloseRoomUseCase::new(repository.clone());

        let first = usecase.execute(&username("alice"), &room_id).await;
        let second = usecase.execute(&username("alice"), &room_id).await;

        assert!(first);
        assert!(!second);
        assert!(alice_rx.recv().await.is_some());
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_close_missing_room() {
        // テスト項目: 存在しないルームの終了は false
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = CloseRoomUseCase::new(repository);

        let closed = usecase
            .execute(&username("alice"), &RoomId::new("R9".to_string()).unwrap())
            .await;

        assert!(!closed);
    }
}
