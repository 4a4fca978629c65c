//! Domain entities: rooms, their members and their logs.

use super::{
    outbox::PusherChannel,
    value_object::{ConnectionId, LogPosition, MessageContent, RoomId, Timestamp},
};

/// A connection registered in a room.
///
/// The registry only holds the send side of the connection's outbox. The
/// connection itself stays owned by its handler task.
#[derive(Debug, Clone)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub connected_at: Timestamp,
    pub outbox: PusherChannel,
}

impl Member {
    pub fn new(connection_id: ConnectionId, connected_at: Timestamp, outbox: PusherChannel) -> Self {
        Self {
            connection_id,
            connected_at,
            outbox,
        }
    }

    pub fn info(&self) -> MemberInfo {
        MemberInfo {
            connection_id: self.connection_id,
            connected_at: self.connected_at,
        }
    }
}

/// Member data safe to hand out of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberInfo {
    pub connection_id: ConnectionId,
    pub connected_at: Timestamp,
}

/// One message of a room's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub position: LogPosition,
    pub content: MessageContent,
    pub appended_at: Timestamp,
}

/// Chat room entity.
///
/// Members are kept in registration order, which is also the fan-out order.
/// The log only ever grows.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub members: Vec<Member>,
    pub log: Vec<LogEntry>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            members: Vec::new(),
            log: Vec::new(),
            created_at,
        }
    }

    /// Add a member. Callers never register the same connection twice.
    pub fn add_member(&mut self, member: Member) {
        debug_assert!(
            !self.contains(&member.connection_id),
            "connection registered twice"
        );
        self.members.push(member);
    }

    /// Remove a member, returning it if it was present.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        let index = self
            .members
            .iter()
            .position(|m| &m.connection_id == connection_id)?;
        Some(self.members.remove(index))
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.iter().any(|m| &m.connection_id == connection_id)
    }

    /// Append a message and return its position.
    pub fn append(&mut self, content: MessageContent, appended_at: Timestamp) -> LogPosition {
        let position = LogPosition::new(self.log.len() as u64);
        self.log.push(LogEntry {
            position,
            content,
            appended_at,
        });
        position
    }

    /// Copy of the current membership, detached from the room.
    pub fn member_snapshot(&self) -> Vec<Member> {
        self.members.clone()
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            members: self.members.len(),
            messages: self.log.len(),
            created_at: self.created_at,
        }
    }

    pub fn detail(&self) -> RoomDetail {
        RoomDetail {
            id: self.id,
            members: self.members.iter().map(Member::info).collect(),
            messages: self.log.len(),
            created_at: self.created_at,
        }
    }
}

/// Counts describing one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub members: usize,
    pub messages: usize,
    pub created_at: Timestamp,
}

/// A room's members and log size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetail {
    pub id: RoomId,
    pub members: Vec<MemberInfo>,
    pub messages: usize,
    pub created_at: Timestamp,
}

/// Result of publishing one message to a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broadcast {
    /// Position assigned to the message in the room's log
    pub position: LogPosition,
    /// Number of members the message was queued for
    pub delivered: usize,
    /// Members dropped from the room because their outbox rejected the message
    pub stale: Vec<ConnectionId>,
}
