//! Infrastructure layer: concrete registry, message pusher and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod registry;
