//! HTTP API calls.

use ichigo_server::infrastructure::dto::http::{
    CreateRoomRequest, CreateRoomResponse, ErrorDto, RoomExistsDto,
};

use crate::error::ClientError;

/// Thin wrapper over the server's REST endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a room with `username` as host and return its id
    pub async fn create_room(&self, room_name: &str, username: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/chat/create", self.base_url))
            .json(&CreateRoomRequest {
                room_name: Some(room_name.to_string()),
                username: Some(username.to_string()),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorDto>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreateRoomResponse = response.json().await?;
        tracing::info!(room_id = %body.room_id, "Room created");
        Ok(body.room_id)
    }

    pub async fn room_exists(&self, room_id: &str) -> Result<bool, ClientError> {
        let body: RoomExistsDto = self
            .http
            .get(format!("{}/api/chat/check/{}", self.base_url, room_id))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.exists)
    }

    /// WebSocket endpoint derived from the HTTP base URL
    pub fn ws_url(&self) -> Result<String, ClientError> {
        if let Some(rest) = self.base_url.strip_prefix("https://") {
            Ok(format!("wss://{rest}/chat"))
        } else if let Some(rest) = self.base_url.strip_prefix("http://") {
            Ok(format!("ws://{rest}/chat"))
        } else {
            Err(ClientError::InvalidServerUrl(self.base_url.clone()))
        }
    }
}
