//! WebSocket message DTOs for the chat application.
//!
//! Every frame is a JSON text message:
//!
//! ```text
//! {"type":"CHAT","content":"hi","sender":"alice","roomId":"1A2B3C4D","timestamp":"2026-10-18 12:00:00"}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    ChatMessage, MessageContent, MessageKind, RoomId, Username, ValueObjectError,
};

/// Message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Chat,
    Join,
    Leave,
    RoomClosed,
    UserList,
    /// Any type this server does not know about
    #[serde(other)]
    Unknown,
}

impl From<MessageKind> for MessageType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Chat => Self::Chat,
            MessageKind::Join => Self::Join,
            MessageKind::Leave => Self::Leave,
            MessageKind::RoomClosed => Self::RoomClosed,
            MessageKind::UserList => Self::UserList,
        }
    }
}

/// Chat message as exchanged with clients, in both directions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub r#type: MessageType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            r#type: message.kind.into(),
            content: message.content.as_str().to_string(),
            sender: message.sender.as_str().to_string(),
            room_id: message.room_id.as_str().to_string(),
            timestamp: Some(message.timestamp.clone()),
        }
    }
}

/// Reasons an inbound frame cannot become a [`ChatMessage`]
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unrecognized message type")]
    UnrecognizedType,

    #[error("Invalid field: {0}")]
    InvalidField(#[from] ValueObjectError),
}

impl TryFrom<ChatMessageDto> for ChatMessage {
    type Error = DecodeError;

    fn try_from(dto: ChatMessageDto) -> Result<Self, Self::Error> {
        let kind = match dto.r#type {
            MessageType::Chat => MessageKind::Chat,
            MessageType::Join => MessageKind::Join,
            MessageType::Leave => MessageKind::Leave,
            MessageType::RoomClosed => MessageKind::RoomClosed,
            MessageType::UserList => MessageKind::UserList,
            MessageType::Unknown => return Err(DecodeError::UnrecognizedType),
        };

        Ok(ChatMessage::with_timestamp(
            kind,
            MessageContent::try_from(dto.content)?,
            Username::try_from(dto.sender)?,
            RoomId::try_from(dto.room_id)?,
            dto.timestamp,
        ))
    }
}

/// Decode an inbound text frame into a domain message
pub fn decode(text: &str) -> Result<ChatMessage, DecodeError> {
    let dto: ChatMessageDto = serde_json::from_str(text)?;
    ChatMessage::try_from(dto)
}

/// Encode a domain message into a text frame
pub fn encode(message: &ChatMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ChatMessageDto::from(message))
}
