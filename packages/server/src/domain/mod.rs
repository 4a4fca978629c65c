//! Domain layer: value objects, entities and the interfaces the outer layers
//! implement.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod outbox;
pub mod registry;
pub mod value_object;

pub use entity::{Broadcast, LogEntry, Member, MemberInfo, Room, RoomDetail, RoomSummary};
pub use error::{InvalidRoomId, MessagePushError};
pub use message_pusher::{BroadcastOutcome, MessagePusher};
pub use outbox::{OutboxReceiver, PusherChannel, WriteInProgress, outbox};
pub use registry::RoomRegistry;
pub use value_object::{ConnectionId, LogPosition, MessageContent, RoomId, Timestamp};

#[cfg(test)]
pub use registry::MockRoomRegistry;
