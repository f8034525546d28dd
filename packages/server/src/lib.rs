//! Ichigo chat server library.
//!
//! Ephemeral, host-owned chat rooms over WebSocket. Rooms live only in
//! memory and disappear when the host closes them or the last participant
//! leaves.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{build_router, run};
