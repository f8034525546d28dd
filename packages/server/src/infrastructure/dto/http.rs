//! HTTP API request and response DTOs for the chat application.

use serde::{Deserialize, Serialize};

use ichigo_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::Room;

/// Body of `POST /api/chat/create`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub room_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: String,
}

/// Read-only projection of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoDto {
    pub room_id: String,
    pub room_name: String,
    pub host_username: String,
    pub created_at: String, // ISO 8601
    pub participant_count: usize,
    pub active: bool,
}

impl From<&Room> for RoomInfoDto {
    fn from(room: &Room) -> Self {
        Self {
            room_id: room.id.as_str().to_string(),
            room_name: room.name.as_str().to_string(),
            host_username: room.host.as_str().to_string(),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
            participant_count: room.participant_count(),
            active: room.is_active(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomExistsDto {
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub rooms: usize,
}

/// Error body returned with 4xx/5xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
