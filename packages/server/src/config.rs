//! Server configuration.

use clap::Parser;

use crate::infrastructure::connection::DEFAULT_OUTBOUND_BUFFER;

/// Ichigo chat server
#[derive(Debug, Clone, Parser)]
#[command(name = "ichigo-server", version, about)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "ICHIGO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "ICHIGO_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Default log level when RUST_LOG is unset
    #[arg(long, env = "ICHIGO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Capacity of each connection's outbound queue
    #[arg(long, env = "ICHIGO_OUTBOUND_BUFFER", default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    pub outbound_buffer: usize,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
