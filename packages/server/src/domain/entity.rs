//! Core domain models for the chat application.

use std::{collections::HashMap, fmt, sync::Arc};

use ichigo_shared::time::message_timestamp_now;

use super::{
    connection::Connection,
    value_object::{MessageContent, RoomId, RoomName, Timestamp, Username},
};

/// Notice sent privately when a client tries to join a missing room
pub const ROOM_NOT_FOUND_NOTICE: &str = "Room not found or inactive";

/// Notice sent privately when the requested username belongs to another connection
pub const USERNAME_TAKEN_NOTICE: &str = "Username is already in use";

/// Notice broadcast to every participant before a room is closed
pub const ROOM_CLOSED_NOTICE: &str = "Room has been closed by the host";

/// Separator used in `USER_LIST` content
pub const USER_LIST_SEPARATOR: &str = ", ";

/// An ephemeral chat room owned by its host.
///
/// A room is only ever observed while active: it is deactivated and removed
/// from the registry in the same critical section.
#[derive(Clone)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Display name
    pub name: RoomName,
    /// Username of the creator, the only one allowed to close the room
    pub host: Username,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    active: bool,
    participants: HashMap<Username, Arc<dyn Connection>>,
}

impl Room {
    /// Create a new active room without participants
    pub fn new(id: RoomId, name: RoomName, host: Username, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            host,
            created_at,
            active: true,
            participants: HashMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the room as closed. Has no effect on an already closed room.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Insert or replace a participant, returning the connection it replaced
    pub fn add_participant(
        &mut self,
        username: Username,
        connection: Arc<dyn Connection>,
    ) -> Option<Arc<dyn Connection>> {
        self.participants.insert(username, connection)
    }

    /// Remove a participant by username
    pub fn remove_participant(&mut self, username: &Username) -> Option<Arc<dyn Connection>> {
        self.participants.remove(username)
    }

    pub fn get_participant(&self, username: &Username) -> Option<&Arc<dyn Connection>> {
        self.participants.get(username)
    }

    pub fn has_participant(&self, username: &Username) -> bool {
        self.participants.contains_key(username)
    }

    /// Usernames of all participants, sorted for a stable roster
    pub fn participant_usernames(&self) -> Vec<Username> {
        let mut usernames: Vec<Username> = self.participants.keys().cloned().collect();
        usernames.sort();
        usernames
    }

    /// Snapshot of the participants' connections
    pub fn connections(&self) -> Vec<Arc<dyn Connection>> {
        self.participants.values().cloned().collect()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn is_host(&self, username: &Username) -> bool {
        &self.host == username
    }
}

impl fmt::Debug for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Room")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("created_at", &self.created_at)
            .field("active", &self.active)
            .field("participants", &self.participant_usernames())
            .finish()
    }
}

/// Kind of a chat message. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Chat,
    Join,
    Leave,
    RoomClosed,
    UserList,
}

/// A transient chat message, built per event and discarded after delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub content: MessageContent,
    pub sender: Username,
    pub room_id: RoomId,
    /// `yyyy-MM-dd HH:mm:ss`, stamped at construction unless supplied
    pub timestamp: String,
}

impl ChatMessage {
    /// Create a message stamped with the current time
    pub fn new(
        kind: MessageKind,
        content: MessageContent,
        sender: Username,
        room_id: RoomId,
    ) -> Self {
        Self::with_timestamp(kind, content, sender, room_id, None)
    }

    /// Create a message, keeping `timestamp` untouched when present
    pub fn with_timestamp(
        kind: MessageKind,
        content: MessageContent,
        sender: Username,
        room_id: RoomId,
        timestamp: Option<String>,
    ) -> Self {
        Self {
            kind,
            content,
            sender,
            room_id,
            timestamp: timestamp.unwrap_or_else(message_timestamp_now),
        }
    }

    /// `<username> joined the room`, sent on behalf of the joining user
    pub fn join_notice(username: &Username, room_id: &RoomId) -> Self {
        Self::new(
            MessageKind::Join,
            MessageContent::from_server(format!("{username} joined the room")),
            username.clone(),
            room_id.clone(),
        )
    }

    /// `<username> left the room`, sent on behalf of the leaving user
    pub fn leave_notice(username: &Username, room_id: &RoomId) -> Self {
        Self::new(
            MessageKind::Leave,
            MessageContent::from_server(format!("{username} left the room")),
            username.clone(),
            room_id.clone(),
        )
    }

    /// Roster of the room as a comma-joined list
    pub fn user_list(usernames: &[Username], room_id: &RoomId) -> Self {
        let content = usernames
            .iter()
            .map(Username::as_str)
            .collect::<Vec<_>>()
            .join(USER_LIST_SEPARATOR);
        Self::system(MessageKind::UserList, content, room_id)
    }

    pub fn room_closed(room_id: &RoomId) -> Self {
        Self::system(MessageKind::RoomClosed, ROOM_CLOSED_NOTICE, room_id)
    }

    /// A private `CHAT` notice from the system
    pub fn system_notice(content: impl Into<String>, room_id: &RoomId) -> Self {
        Self::system(MessageKind::Chat, content, room_id)
    }

    fn system(kind: MessageKind, content: impl Into<String>, room_id: &RoomId) -> Self {
        Self::new(
            kind,
            MessageContent::from_server(content.into()),
            Username::system(),
            room_id.clone(),
        )
    }
}
