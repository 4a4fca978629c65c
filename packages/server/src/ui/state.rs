//! Server state shared by all handlers.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectParticipantUseCase, GetChatLogsUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        SendMessageUseCase,
    },
};

/// Per-connection limits taken from the server configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Upper bound for writing one frame to a peer
    pub send_timeout: Duration,
    /// Largest accepted inbound message
    pub max_message_bytes: usize,
}

impl From<&ServerConfig> for ConnectionSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            send_timeout: config.send_timeout(),
            max_message_bytes: config.max_message_bytes,
        }
    }
}

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetChatLogsUseCase（チャット履歴取得のユースケース）
    pub get_chat_logs_usecase: Arc<GetChatLogsUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// Per-connection limits
    pub connection_settings: ConnectionSettings,
    /// Flips to `true` once the server starts shutting down
    pub shutdown: watch::Receiver<bool>,
}
