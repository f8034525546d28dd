//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};

use crate::{
    domain::Connection,
    infrastructure::{
        connection::ChannelConnection,
        dto::websocket::{DecodeError, decode},
    },
    ui::state::AppState,
    usecase::ChatSession,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let (connection, mut rx) = ChannelConnection::new(state.outbound_buffer);
    let connection_id = connection.id();
    let mut session = ChatSession::new(state.repository.clone(), Arc::new(connection));
    tracing::info!(connection_id = %connection_id, "WebSocket connected");

    // Writer: drain the outbound queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender
                .send(Message::Text(payload.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    // Reader: runs inline so the session outlives it for cleanup
    loop {
        tokio::select! {
            frame = receiver.next() => {
                let msg = match frame {
                    Some(Ok(msg)) => msg,
                    Some(Err(e)) => {
                        tracing::warn!(connection_id = %connection_id, error = %e, "WebSocket error");
                        break;
                    }
                    None => break,
                };

                match msg {
                    Message::Text(text) => match decode(&text) {
                        Ok(message) => {
                            tracing::debug!(
                                connection_id = %connection_id,
                                kind = ?message.kind,
                                room_id = %message.room_id,
                                sender = %message.sender,
                                "Received message"
                            );
                            session.handle(message).await;
                        }
                        Err(DecodeError::UnrecognizedType) => {
                            tracing::debug!(connection_id = %connection_id, "Ignored message of unknown type");
                        }
                        Err(e) => {
                            tracing::warn!(connection_id = %connection_id, error = %e, "Dropped invalid message");
                        }
                    },
                    Message::Close(_) => {
                        tracing::info!(connection_id = %connection_id, "Client requested close");
                        break;
                    }
                    Message::Binary(_) => {
                        tracing::debug!(connection_id = %connection_id, "Ignored binary frame");
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    Message::Ping(_) | Message::Pong(_) => {}
                }
            }
            _ = &mut send_task => {
                tracing::debug!(connection_id = %connection_id, "Writer stopped");
                break;
            }
        }
    }

    session.disconnect().await;
    send_task.abort();
    tracing::info!(connection_id = %connection_id, "WebSocket disconnected");
}
