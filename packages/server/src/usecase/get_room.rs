//! UseCase: ルーム情報の参照

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository};

/// ルーム参照のユースケース
pub struct GetRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Active room snapshot, or `None` if the room is missing or closed
    pub async fn execute(&self, room_id: &RoomId) -> Option<Room> {
        self.repository
            .get_room(room_id)
            .await
            .filter(Room::is_active)
    }

    pub async fn exists(&self, room_id: &RoomId) -> bool {
        self.repository.room_exists(room_id).await
    }
}
