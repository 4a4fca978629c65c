//! Value objects of the chat domain.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::error::InvalidRoomId;

/// Identifier of a chat room.
///
/// Rooms are keyed by the index of the study they belong to. Any integer is
/// accepted; the study registry is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(i64);

impl RoomId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for RoomId {
    type Err = InvalidRoomId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| InvalidRoomId(raw.to_string()))
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one live connection, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordinal of a message within its room's log, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LogPosition(u64);

impl LogPosition {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque chat payload.
///
/// Stored and delivered verbatim. The text is reference counted because one
/// message is queued for every member of the room.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageContent(Arc<str>);

impl MessageContent {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl Serialize for MessageContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_parses_integer_path_segment() {
        // テスト項目: 整数のパスセグメントから RoomId を生成できる
        // given (前提条件):
        let raw = "7";

        // when (操作):
        let result = RoomId::from_str(raw);

        // then (期待する結果):
        assert_eq!(result, Ok(RoomId::new(7)));
    }

    #[test]
    fn test_room_id_accepts_negative_and_large_values() {
        // テスト項目: 負の値や大きな値も RoomId として受け付ける（スタディの存在は確認しない）
        // given (前提条件):
        let negative = "-3";
        let large = "9007199254740993";

        // when (操作):
        let negative_id = RoomId::from_str(negative);
        let large_id = RoomId::from_str(large);

        // then (期待する結果):
        assert_eq!(negative_id, Ok(RoomId::new(-3)));
        assert_eq!(large_id, Ok(RoomId::new(9007199254740993)));
    }

    #[test]
    fn test_room_id_rejects_non_integer() {
        // テスト項目: 整数以外の文字列はエラーになる
        // given (前提条件):
        let raw = "toeic";

        // when (操作):
        let result = RoomId::from_str(raw);

        // then (期待する結果):
        assert_eq!(result, Err(InvalidRoomId("toeic".to_string())));
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成される ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let first = ConnectionId::generate();
        let second = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_message_content_is_stored_verbatim() {
        // テスト項目: メッセージ内容は加工されずにそのまま保持される
        // given (前提条件):
        let raw = "  {\"user\":\"김토익\",\"text\":\"hello\"}  ";

        // when (操作):
        let content = MessageContent::from(raw);

        // then (期待する結果):
        assert_eq!(content.as_str(), raw);
        assert_eq!(content.len(), raw.len());
        assert_eq!(serde_json::to_string(&content).unwrap(), serde_json::to_string(raw).unwrap());
    }
}
