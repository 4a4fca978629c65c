//! HTTP API response bodies.

use serde::{Deserialize, Serialize};

/// Body of `GET /chat/{room_id}/logs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLogsResponse {
    /// Raw message texts in log order
    pub logs: Vec<String>,
}

/// One entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub room_id: i64,
    pub members: usize,
    pub messages: usize,
    /// RFC 3339 (KST)
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room_id: i64,
    pub members: Vec<MemberDto>,
    pub messages: usize,
    /// RFC 3339 (KST)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDto {
    pub connection_id: String,
    /// RFC 3339 (KST)
    pub connected_at: String,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}
