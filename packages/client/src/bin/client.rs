//! Ichigo terminal chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin ichigo-client -- create --room-name Trivia --username alice
//! cargo run --bin ichigo-client -- join --room-id 1A2B3C4D --username bob
//! ```

use clap::Parser;
use ichigo_client::cli::Cli;
use ichigo_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &cli.log_level);

    if let Err(e) = ichigo_client::run(cli).await {
        tracing::error!(error = %e, "Client error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
