//! Test server fixture shared by the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use ichigo_server::{build_router, ui::state::AppState};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// In-process server bound to an ephemeral port, with a fresh registry
pub struct TestServer {
    addr: std::net::SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let app = build_router(Arc::new(AppState::default()));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/chat", self.addr)
    }

    /// Create a room over HTTP and return its id
    pub async fn create_room(&self, room_name: &str, username: &str) -> String {
        let body: Value = reqwest::Client::new()
            .post(format!("{}/api/chat/create", self.base_url()))
            .json(&json!({ "roomName": room_name, "username": username }))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON");
        body["roomId"].as_str().expect("roomId missing").to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// WebSocket client speaking the chat frame format
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    pub async fn send(&mut self, r#type: &str, sender: &str, room_id: &str, content: &str) {
        let frame = json!({
            "type": r#type,
            "content": content,
            "sender": sender,
            "roomId": room_id,
        });
        self.send_raw(&frame.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next chat frame, failing the test after two seconds
    pub async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(2), self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Stream ended")
                .expect("WebSocket error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).expect("Frame is not JSON");
            }
        }
    }

    /// Assert nothing arrives within a short window
    pub async fn expect_silence(&mut self) {
        let result = tokio::time::timeout(Duration::from_millis(200), self.stream.next()).await;
        assert!(result.is_err(), "Unexpected frame: {result:?}");
    }

    /// Join and consume the JOIN and USER_LIST frames addressed to this client
    pub async fn join(&mut self, username: &str, room_id: &str) {
        self.send("JOIN", username, room_id, "").await;
        assert_eq!(self.recv().await["type"], "JOIN");
        assert_eq!(self.recv().await["type"], "USER_LIST");
    }

    /// Drop the connection without a close handshake
    pub fn abort(self) {
        drop(self.stream);
    }
}
