//! Shared utilities for the Ichigo server and client.

pub mod logger;
pub mod time;
