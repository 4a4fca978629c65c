//! Composition root: wires the in-memory registry, the use cases and the
//! server together.

use std::sync::Arc;

use studyroom_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    domain::RoomRegistry,
    infrastructure::{message_pusher::ChannelMessagePusher, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, GetChatLogsUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        SendMessageUseCase,
    },
};

/// Build a server backed by the in-memory registry and the system clock.
pub fn build_server(config: ServerConfig) -> Server {
    build_server_with_clock(config, Arc::new(SystemClock))
}

/// Build a server backed by the in-memory registry and the given clock.
pub fn build_server_with_clock(config: ServerConfig, clock: Arc<dyn Clock>) -> Server {
    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. Registry
    // 3. UseCases
    // 4. Server
    let message_pusher = Arc::new(ChannelMessagePusher::new(config.outbox_limits()));
    let registry: Arc<dyn RoomRegistry> =
        Arc::new(InMemoryRoomRegistry::new(message_pusher, clock.clone()));

    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        clock,
        config.max_connections,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(registry.clone()));
    let get_chat_logs_usecase = Arc::new(GetChatLogsUseCase::new(registry.clone()));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry.clone()));
    let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(registry));

    Server::new(
        connect_participant_usecase,
        send_message_usecase,
        get_chat_logs_usecase,
        get_rooms_usecase,
        get_room_detail_usecase,
        config,
    )
}
