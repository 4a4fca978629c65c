//! Request handlers.

pub mod http;
pub mod websocket;

pub use http::{get_chat_logs, get_room_detail, get_rooms, health_check};
pub use websocket::chat_websocket_handler;
