//! Server runner: router assembly and the serve loop.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    error::ServerError,
    infrastructure::repository::InMemoryRoomRepository,
    ui::{
        handler::{check_room, create_room, get_room_info, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the application router over `state`
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat/create", post(create_room))
        .route("/api/chat/room/{room_id}", get(get_room_info))
        .route("/api/chat/check/{room_id}", get(check_room))
        .route("/chat", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until a shutdown signal arrives
///
/// # Errors
///
/// Returns `ServerError::Bind` if the address cannot be bound and
/// `ServerError::Serve` if the server stops with an IO error.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let repository = Arc::new(InMemoryRoomRepository::new());
    let state = Arc::new(AppState::new(repository, config.outbound_buffer));
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}
