//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! 2 つの HashMap（ルーム ID → Room、ユーザー名 → ルーム ID）を
//! 1 つの Mutex で保護し、両方の更新を常に同じクリティカルセクション内で行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use ichigo_shared::time::get_jst_timestamp;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, RepositoryError, Room, RoomId, RoomIdFactory, RoomName,
    RoomRepository, Timestamp, Username, ValueObjectError,
};

type IdGenerator = Box<dyn Fn() -> Result<RoomId, ValueObjectError> + Send + Sync>;

#[derive(Default)]
struct RegistryState {
    rooms_by_id: HashMap<RoomId, Room>,
    room_id_by_username: HashMap<Username, RoomId>,
}

impl RegistryState {
    /// Remove `username` from `room_id` and drop the room if it became empty.
    fn detach(&mut self, username: &Username, room_id: &RoomId) {
        self.room_id_by_username.remove(username);

        let now_empty = match self.rooms_by_id.get_mut(room_id) {
            Some(room) => {
                room.remove_participant(username);
                room.is_empty()
            }
            None => false,
        };

        if now_empty {
            self.rooms_by_id.remove(room_id);
            tracing::info!(room_id = %room_id, "Last participant left, room removed");
        }
    }
}

/// インメモリ Room Repository 実装
///
/// HashMap をインメモリ DB として使用する実装。
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    state: Mutex<RegistryState>,
    generate_id: IdGenerator,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_id_generator(RoomIdFactory::generate)
    }

    /// ルーム ID の生成方法を差し替えて作成
    pub fn with_id_generator<F>(generate_id: F) -> Self
    where
        F: Fn() -> Result<RoomId, ValueObjectError> + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(RegistryState::default()),
            generate_id: Box::new(generate_id),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create_room(&self, name: RoomName, host: Username) -> Result<RoomId, RepositoryError> {
        let room_id = (self.generate_id)()?;

        let mut state = self.state.lock().await;
        if state.rooms_by_id.contains_key(&room_id) {
            tracing::error!(room_id = %room_id, "Generated room id collides with a live room");
            return Err(RepositoryError::RoomIdCollision(room_id));
        }

        let room = Room::new(
            room_id.clone(),
            name,
            host,
            Timestamp::new(get_jst_timestamp()),
        );
        tracing::info!(room_id = %room_id, name = %room.name, host = %room.host, "Room created");
        state.rooms_by_id.insert(room_id.clone(), room);

        Ok(room_id)
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let state = self.state.lock().await;
        state.rooms_by_id.get(room_id).cloned()
    }

    async fn room_exists(&self, room_id: &RoomId) -> bool {
        let state = self.state.lock().await;
        state
            .rooms_by_id
            .get(room_id)
            .is_some_and(Room::is_active)
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        username: Username,
        connection: Arc<dyn Connection>,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;

        if !state
            .rooms_by_id
            .get(room_id)
            .is_some_and(Room::is_active)
        {
            return Err(RepositoryError::RoomNotFound(room_id.clone()));
        }

        if let Some(current_room_id) = state.room_id_by_username.get(&username).cloned() {
            let holder = state
                .rooms_by_id
                .get(&current_room_id)
                .and_then(|room| room.get_participant(&username))
                .cloned();

            // A closed holder is a disconnect that has not been processed yet
            if let Some(holder) = holder
                && holder.id() != connection.id()
                && holder.is_open()
            {
                return Err(RepositoryError::UsernameTaken(username.into_string()));
            }

            if &current_room_id != room_id {
                state.detach(&username, &current_room_id);
            }
        }

        // The target room may only vanish through detach when it was the old room,
        // and that case is excluded above.
        let Some(room) = state.rooms_by_id.get_mut(room_id) else {
            return Err(RepositoryError::RoomNotFound(room_id.clone()));
        };
        room.add_participant(username.clone(), connection);
        state
            .room_id_by_username
            .insert(username, room_id.clone());

        Ok(())
    }

    async fn remove_participant(
        &self,
        username: &Username,
        connection_id: &ConnectionId,
    ) -> Option<RoomId> {
        let mut state = self.state.lock().await;

        let room_id = state.room_id_by_username.get(username)?.clone();
        let bound_here = state
            .rooms_by_id
            .get(&room_id)
            .and_then(|room| room.get_participant(username))
            .is_some_and(|connection| &connection.id() == connection_id);

        if !bound_here {
            return None;
        }

        state.detach(username, &room_id);
        Some(room_id)
    }

    async fn room_id_of(&self, username: &Username) -> Option<RoomId> {
        let state = self.state.lock().await;
        state.room_id_by_username.get(username).cloned()
    }

    async fn begin_close(&self, room_id: &RoomId) -> Option<Vec<Arc<dyn Connection>>> {
        let mut state = self.state.lock().await;

        let room = state
            .rooms_by_id
            .get_mut(room_id)
            .filter(|room| room.is_active())?;
        room.deactivate();

        tracing::debug!(room_id = %room_id, participants = room.participant_count(), "Room closing");
        Some(room.connections())
    }

    async fn close_room(&self, room_id: &RoomId) -> bool {
        let mut state = self.state.lock().await;

        let Some(room) = state.rooms_by_id.get_mut(room_id) else {
            return false;
        };
        room.deactivate();
        let usernames = room.participant_usernames();

        for username in &usernames {
            if state.room_id_by_username.get(username) == Some(room_id) {
                state.room_id_by_username.remove(username);
            }
        }
        state.rooms_by_id.remove(room_id);

        tracing::info!(
            room_id = %room_id,
            released = usernames.len(),
            "Room closed"
        );
        true
    }

    async fn is_host(&self, username: &Username, room_id: &RoomId) -> bool {
        let state = self.state.lock().await;
        state
            .rooms_by_id
            .get(room_id)
            .is_some_and(|room| room.is_host(username))
    }

    async fn count_rooms(&self) -> usize {
        let state = self.state.lock().await;
        state.rooms_by_id.len()
    }
}
