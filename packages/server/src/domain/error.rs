//! Domain error types.

use thiserror::Error;

use super::value_object::ConnectionId;

/// A room identifier that is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid room id '{0}': expected an integer")]
pub struct InvalidRoomId(pub String);

/// Failure to queue a message for one connection.
///
/// Every variant marks the connection as stale: it is dropped from its room
/// instead of failing the broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// Queued bytes would exceed the per-connection limit.
    #[error("outbox of connection '{0}' is full")]
    OutboxFull(ConnectionId),

    /// Messages are piling up behind a write that has not completed.
    #[error("writer of connection '{0}' is stalled")]
    WriterStalled(ConnectionId),

    /// The peer's writer has already stopped.
    #[error("outbox of connection '{0}' is closed")]
    OutboxClosed(ConnectionId),
}

impl MessagePushError {
    pub fn connection_id(&self) -> ConnectionId {
        match self {
            Self::OutboxFull(id) | Self::WriterStalled(id) | Self::OutboxClosed(id) => *id,
        }
    }
}
