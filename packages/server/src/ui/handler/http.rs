//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    domain::{RoomId, RoomName, Username},
    infrastructure::dto::http::{
        CreateRoomRequest, CreateRoomResponse, ErrorDto, HealthDto, RoomExistsDto, RoomInfoDto,
    },
    ui::state::AppState,
    usecase::{CreateRoomUseCase, GetRoomUseCase},
};

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        rooms: state.repository.count_rooms().await,
    })
}

/// Create a room; the host joins separately over the WebSocket
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!(error = %e, "Rejected create request body");
        api_error(StatusCode::BAD_REQUEST, "Invalid request body")
    })?;

    let (Some(room_name), Some(username)) = (request.room_name, request.username) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "roomName and username are required",
        ));
    };

    // Convert String -> Domain Models
    let room_name = RoomName::try_from(room_name)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let host = Username::try_from(username)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let usecase = CreateRoomUseCase::new(state.repository.clone());
    match usecase.execute(room_name, host).await {
        Ok(room_id) => Ok(Json(CreateRoomResponse {
            room_id: room_id.into_string(),
        })),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create room");
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Get room info by ID; closed or unknown rooms are 404
pub async fn get_room_info(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomInfoDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::NOT_FOUND)?;

    let usecase = GetRoomUseCase::new(state.repository.clone());
    let room = usecase
        .execute(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(RoomInfoDto::from(&room)))
}

/// Whether a room exists and is active
pub async fn check_room(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Json<RoomExistsDto> {
    let exists = match RoomId::try_from(room_id) {
        Ok(room_id) => {
            GetRoomUseCase::new(state.repository.clone())
                .exists(&room_id)
                .await
        }
        Err(_) => false,
    };
    Json(RoomExistsDto { exists })
}
