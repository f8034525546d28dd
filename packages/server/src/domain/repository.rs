//! Room registry abstraction.
//!
//! The use case layer depends on this trait; the infrastructure layer
//! provides the implementation.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    ConnectionId, Room, RoomId, RoomName, Username, connection::Connection,
    error::RepositoryError,
};

/// Registry of live rooms and of the room each username currently occupies.
///
/// Every method keeps both indexes consistent: a username maps to a room if
/// and only if that room lists the username as a participant.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create an active, empty room and return its fresh id
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::RoomIdCollision` if the generated id is
    /// already live. The existing room is left untouched.
    async fn create_room(&self, name: RoomName, host: Username) -> Result<RoomId, RepositoryError>;

    /// Snapshot of a room, if it exists
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// True iff the room exists and is active
    async fn room_exists(&self, room_id: &RoomId) -> bool;

    /// Bind `username` to `connection` inside the room
    ///
    /// A username already bound to a different room through the same
    /// connection moves to the new room.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::RoomNotFound` if the room is absent or closed
    /// - `RepositoryError::UsernameTaken` if another connection holds the username
    async fn add_participant(
        &self,
        room_id: &RoomId,
        username: Username,
        connection: Arc<dyn Connection>,
    ) -> Result<(), RepositoryError>;

    /// Remove `username` from its room if it is bound to `connection_id`.
    ///
    /// Deletes the room when it becomes empty. Returns the room that was left.
    async fn remove_participant(
        &self,
        username: &Username,
        connection_id: &ConnectionId,
    ) -> Option<RoomId>;

    /// Room currently occupied by `username`
    async fn room_id_of(&self, username: &Username) -> Option<RoomId>;

    /// Deactivate the room and snapshot its participants' connections.
    ///
    /// Once this returns, `room_exists` is false and `add_participant` fails
    /// with `RoomNotFound`, so the snapshot is final. Returns `None` if the
    /// room is absent or already closing.
    async fn begin_close(&self, room_id: &RoomId) -> Option<Vec<Arc<dyn Connection>>>;

    /// Deactivate and remove the room, releasing every participant's username.
    ///
    /// Returns whether a room was closed.
    async fn close_room(&self, room_id: &RoomId) -> bool;

    /// True iff the room exists and `username` created it
    async fn is_host(&self, username: &Username, room_id: &RoomId) -> bool;

    /// Number of live rooms
    async fn count_rooms(&self) -> usize;
}
