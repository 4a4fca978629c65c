//! Conversion logic from domain entities to HTTP DTOs.

use studyroom_shared::time::timestamp_to_kst_rfc3339;

use crate::domain::{LogEntry, MemberInfo, RoomDetail, RoomSummary};

use super::http::{ChatLogsResponse, MemberDto, RoomDetailDto, RoomSummaryDto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Vec<LogEntry>> for ChatLogsResponse {
    fn from(entries: Vec<LogEntry>) -> Self {
        Self {
            logs: entries
                .into_iter()
                .map(|entry| entry.content.as_str().to_string())
                .collect(),
        }
    }
}

impl From<RoomSummary> for RoomSummaryDto {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.id.value(),
            members: summary.members,
            messages: summary.messages,
            created_at: timestamp_to_kst_rfc3339(summary.created_at.value()),
        }
    }
}

impl From<MemberInfo> for MemberDto {
    fn from(member: MemberInfo) -> Self {
        Self {
            connection_id: member.connection_id.to_string(),
            connected_at: timestamp_to_kst_rfc3339(member.connected_at.value()),
        }
    }
}

impl From<RoomDetail> for RoomDetailDto {
    fn from(detail: RoomDetail) -> Self {
        Self {
            room_id: detail.id.value(),
            members: detail.members.into_iter().map(MemberDto::from).collect(),
            messages: detail.messages,
            created_at: timestamp_to_kst_rfc3339(detail.created_at.value()),
        }
    }
}
