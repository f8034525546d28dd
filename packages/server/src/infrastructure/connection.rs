//! Channel-backed connection.
//!
//! Each WebSocket owns a bounded outbound queue drained by a writer task.
//! Sending never waits: a full queue rejects the payload for that
//! connection only, so one slow client cannot stall a broadcast.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{Connection, ConnectionError, ConnectionId, ConnectionIdFactory};

/// Default capacity of a connection's outbound queue
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// [`Connection`] that forwards payloads into an mpsc queue
#[derive(Debug, Clone)]
pub struct ChannelConnection {
    id: ConnectionId,
    sender: mpsc::Sender<Arc<str>>,
}

impl ChannelConnection {
    /// Create a connection and the receiving end of its outbound queue.
    ///
    /// The connection reports itself closed once the receiver is dropped.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let connection = Self {
            id: ConnectionIdFactory::generate(),
            sender,
        };
        (connection, receiver)
    }
}

impl Connection for ChannelConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    fn send(&self, payload: Arc<str>) -> Result<(), ConnectionError> {
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => ConnectionError::Backpressure,
            TrySendError::Closed(_) => ConnectionError::Closed,
        })
    }
}
