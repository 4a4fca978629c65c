//! HTTP API endpoint handlers.

use std::{str::FromStr, sync::Arc};

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{ChatLogsResponse, HealthDto, RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
    usecase::GetRoomDetailError,
};

/// Parse a room id path segment, answering `422` for non-integers.
pub(crate) fn parse_room_id(raw: &str) -> Result<RoomId, StatusCode> {
    RoomId::from_str(raw).map_err(|e| {
        tracing::warn!("{}", e);
        StatusCode::UNPROCESSABLE_ENTITY
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Get the full chat log of a room
///
/// Rooms that were never used answer an empty log.
pub async fn get_chat_logs(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<ChatLogsResponse>, StatusCode> {
    let room_id = parse_room_id(&room_id)?;
    let entries = state.get_chat_logs_usecase.execute(room_id);
    Ok(Json(entries.into()))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute();
    Json(rooms.into_iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = parse_room_id(&room_id)?;
    match state.get_room_detail_usecase.execute(room_id) {
        Ok(detail) => Ok(Json(detail.into())),
        Err(GetRoomDetailError::RoomNotFound) => Err(StatusCode::NOT_FOUND),
    }
}
