//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::RoomId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("Username cannot be empty")]
    UsernameEmpty,

    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    #[error("Room name cannot be empty")]
    RoomNameEmpty,

    #[error("Room name cannot exceed {max} characters (got {actual})")]
    RoomNameTooLong { max: usize, actual: usize },

    #[error("MessageContent cannot exceed {max} characters (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors returned by the room registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The room does not exist or has been closed
    #[error("Room not found or inactive: {0}")]
    RoomNotFound(RoomId),

    /// The username is bound to another live connection
    #[error("Username '{0}' is already in use")]
    UsernameTaken(String),

    /// A freshly generated id matched a live room
    #[error("Generated room id collides with an existing room: {0}")]
    RoomIdCollision(RoomId),

    /// The room id generator failed
    #[error("Failed to generate room id: {0}")]
    IdGeneration(#[from] ValueObjectError),
}

/// Errors returned when delivering a payload to a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Connection is closed")]
    Closed,

    #[error("Outbound queue is full")]
    Backpressure,
}
