//! Client errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Room '{0}' not found or inactive")]
    RoomNotFound(String),

    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to encode message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Terminal error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
