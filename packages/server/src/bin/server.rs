//! Ichigo chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ichigo-server -- --port 8080
//! ```

use clap::Parser;
use ichigo_server::ServerConfig;
use ichigo_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    if let Err(e) = ichigo_server::run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
