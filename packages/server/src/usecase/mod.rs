//! UseCase layer: application operations composed from the domain interfaces.

pub mod connect_participant;
pub mod error;
pub mod get_chat_logs;
pub mod get_room_detail;
pub mod get_rooms;
pub mod send_message;

pub use connect_participant::{Admission, ConnectParticipantUseCase, Registration};
pub use error::{ConnectError, GetRoomDetailError};
pub use get_chat_logs::GetChatLogsUseCase;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use send_message::SendMessageUseCase;
