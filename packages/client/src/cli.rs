//! Command line interface.

use clap::{Parser, Subcommand};

/// Ichigo chat client
#[derive(Debug, Clone, Parser)]
#[command(name = "ichigo-client", version, about)]
pub struct Cli {
    /// Base URL of the chat server
    #[arg(long, env = "ICHIGO_SERVER", default_value = "http://127.0.0.1:8080")]
    pub server: String,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "ICHIGO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a room as its host, then join it
    Create {
        #[arg(long)]
        room_name: String,
        #[arg(short, long)]
        username: String,
    },
    /// Join an existing room
    Join {
        #[arg(long)]
        room_id: String,
        #[arg(short, long)]
        username: String,
    },
}
