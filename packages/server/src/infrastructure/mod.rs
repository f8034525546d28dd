//! Infrastructure layer
//!
//! Concrete implementations of the domain traits (registry, connection) and
//! the DTOs exchanged over HTTP and WebSocket.

pub mod connection;
pub mod dto;
pub mod repository;
