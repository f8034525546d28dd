//! Shared application state.

use std::sync::Arc;

use crate::{domain::RoomRepository, infrastructure::connection::DEFAULT_OUTBOUND_BUFFER};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn RoomRepository>,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}

impl AppState {
    pub fn new(repository: Arc<dyn RoomRepository>, outbound_buffer: usize) -> Self {
        Self {
            repository,
            outbound_buffer,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            Arc::new(crate::infrastructure::repository::InMemoryRoomRepository::new()),
            DEFAULT_OUTBOUND_BUFFER,
        )
    }
}
