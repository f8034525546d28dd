//! Connection capability used by the room registry and the dispatcher.
//!
//! The domain never creates or tears down a connection. It only asks whether
//! the connection is open and hands it serialized payloads.

use std::sync::Arc;

use super::{ConnectionId, error::ConnectionError};

/// One bidirectional message channel to a client.
#[cfg_attr(test, mockall::automock)]
pub trait Connection: Send + Sync {
    /// Unique identifier of this connection
    fn id(&self) -> ConnectionId;

    /// Whether the connection can still accept payloads
    fn is_open(&self) -> bool;

    /// Queue a serialized payload for delivery without blocking.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Closed` if the peer is gone and
    /// `ConnectionError::Backpressure` if its outbound queue is full.
    fn send(&self, payload: Arc<str>) -> Result<(), ConnectionError>;
}
