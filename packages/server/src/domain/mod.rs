//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod connection;
pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use connection::Connection;
pub use entity::{ChatMessage, MessageKind, Room};
pub use error::{ConnectionError, RepositoryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RoomIdFactory};
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, MessageContent, RoomId, RoomName, Timestamp, Username};
