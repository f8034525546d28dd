//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a username.
pub const USERNAME_MAX_LEN: usize = 100;

/// Maximum length of a room identifier accepted from clients.
pub const ROOM_ID_MAX_LEN: usize = 100;

/// Maximum length of a room display name.
pub const ROOM_NAME_MAX_LEN: usize = 100;

/// Maximum length of a message body.
pub const MESSAGE_CONTENT_MAX_LEN: usize = 10000;

/// Length of generated room identifiers.
pub const ROOM_ID_LEN: usize = 8;

/// Sender name used for messages generated by the server itself.
pub const SYSTEM_SENDER: &str = "System";

/// Participant identity value object.
///
/// The display name a participant chose when joining a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Create a new Username.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or longer than [`USERNAME_MAX_LEN`].
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.is_empty() {
            return Err(ValueObjectError::UsernameEmpty);
        }
        let len = name.chars().count();
        if len > USERNAME_MAX_LEN {
            return Err(ValueObjectError::UsernameTooLong {
                max: USERNAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Sender of server-generated notices.
    pub fn system() -> Self {
        Self(SYSTEM_SENDER.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Username {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Generated identifiers are short upper-case tokens meant to be typed by
/// hand; identifiers received from clients are only checked for length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or longer than [`ROOM_ID_MAX_LEN`].
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.chars().count();
        if len > ROOM_ID_MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Derive a RoomId from the first [`ROOM_ID_LEN`] hex digits of a UUID, upper-cased.
    pub fn from_uuid(uuid: uuid::Uuid) -> Result<Self, ValueObjectError> {
        let simple = uuid.simple().to_string();
        Self::new(simple[..ROOM_ID_LEN].to_uppercase())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room display name value object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed name is empty or longer than [`ROOM_NAME_MAX_LEN`].
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = trimmed.chars().count();
        if len > ROOM_NAME_MAX_LEN {
            return Err(ValueObjectError::RoomNameTooLong {
                max: ROOM_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message content value object.
///
/// Content may be empty: `JOIN` and `LEAVE` requests carry no text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is longer than [`MESSAGE_CONTENT_MAX_LEN`].
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        let len = content.chars().count();
        if len > MESSAGE_CONTENT_MAX_LEN {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(content))
    }

    /// Content produced by the server itself; the client length limit does not apply.
    pub(crate) fn from_server(content: String) -> Self {
        Self(content)
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one live connection, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
