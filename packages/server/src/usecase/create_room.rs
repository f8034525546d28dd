//! UseCase: ルーム作成処理

use std::sync::Arc;

use crate::domain::{RoomId, RoomName, RoomRepository, Username};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルームを作成し、その ID を返す
    ///
    /// The host is recorded but does not join; joining happens over the
    /// WebSocket like any other participant.
    ///
    /// # Errors
    ///
    /// Returns `CreateRoomError::Registry` if the registry could not allocate
    /// a unique id.
    pub async fn execute(&self, name: RoomName, host: Username) -> Result<RoomId, CreateRoomError> {
        let room_id = self.repository.create_room(name, host).await?;
        Ok(room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{RepositoryError, ValueObjectError},
        infrastructure::repository::InMemoryRoomRepository,
    };

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: ルームが作成され、存在チェックが true になる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = CreateRoomUseCase::new(repository.clone());

        // when (操作):
        let result = usecase
            .execute(
                RoomName::new("Trivia".to_string()).unwrap(),
                Username::new("alice".to_string()).unwrap(),
            )
            .await;

        // then (期待する結果):
        let room_id = result.unwrap();
        assert!(repository.room_exists(&room_id).await);
        let room = repository.get_room(&room_id).await.unwrap();
        assert_eq!(room.participant_count(), 0);
        assert_eq!(room.host.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_create_room_id_generation_failure_is_reported() {
        // テスト項目: ID 生成の失敗は呼び出し元に伝わる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::with_id_generator(|| {
            Err(ValueObjectError::RoomIdEmpty)
        }));
        let usecase = CreateRoomUseCase::new(repository);

        // when (操作):
        let result = usecase
            .execute(
                RoomName::new("Trivia".to_string()).unwrap(),
                Username::new("alice".to_string()).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CreateRoomError::Registry(RepositoryError::IdGeneration(
                ValueObjectError::RoomIdEmpty
            )))
        );
    }
}
