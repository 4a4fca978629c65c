//! Server execution logic.

use std::{future::Future, io, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::{net::TcpListener, sync::watch};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectParticipantUseCase, GetChatLogsUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        SendMessageUseCase,
    },
};

use super::{
    handler::{chat_websocket_handler, get_chat_logs, get_room_detail, get_rooms, health_check},
    signal::shutdown_signal,
    state::{AppState, ConnectionSettings},
};

/// How often the drain loop checks for remaining connections
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[from] io::Error),
}

/// Study room chat server
///
/// # Example
///
/// ```ignore
/// let server = build_server(ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// GetChatLogsUseCase（チャット履歴取得のユースケース）
    get_chat_logs_usecase: Arc<GetChatLogsUseCase>,
    /// GetRoomsUseCase（Room 一覧取得のユースケース）
    get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（Room 詳細取得のユースケース）
    get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    config: ServerConfig,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_participant_usecase` - UseCase for admission and room registration
    /// * `send_message_usecase` - UseCase for message broadcasting
    /// * `get_chat_logs_usecase` - UseCase for reading a room's history
    /// * `get_rooms_usecase` - UseCase for getting rooms list
    /// * `get_room_detail_usecase` - UseCase for getting room detail
    /// * `config` - Bind address and connection limits
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_chat_logs_usecase: Arc<GetChatLogsUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
        get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
        config: ServerConfig,
    ) -> Self {
        Self {
            connect_participant_usecase,
            send_message_usecase,
            get_chat_logs_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
            config,
        }
    }

    /// Bind the configured address and serve until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` resolves.
    ///
    /// On shutdown, new connections are refused, open chat connections are
    /// told to close, and the call returns once they are gone or the grace
    /// period has elapsed.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let grace = self.config.shutdown_grace();
        let connect_participant_usecase = self.connect_participant_usecase.clone();

        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            send_message_usecase: self.send_message_usecase,
            get_chat_logs_usecase: self.get_chat_logs_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
            get_room_detail_usecase: self.get_room_detail_usecase,
            connection_settings: ConnectionSettings::from(&self.config),
            shutdown: shutdown_rx,
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws/chat/{room_id}", get(chat_websocket_handler))
            // HTTP エンドポイント
            .route("/chat/{room_id}/logs", get(get_chat_logs))
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room_id}", get(get_room_detail))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let local_addr = listener.local_addr()?;
        tracing::info!("Study room chat server listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws/chat/{{room_id}}", local_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let stopping = {
            let connect_participant_usecase = connect_participant_usecase.clone();
            async move {
                signal.await;
                connect_participant_usecase.close_admission();
                let _ = shutdown_tx.send(true);
                tracing::info!("Shutting down, closing open connections");
            }
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(stopping)
            .await?;

        drain_connections(&connect_participant_usecase, grace).await;
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait until every chat connection has left its room, up to `grace`.
async fn drain_connections(connect_participant_usecase: &ConnectParticipantUseCase, grace: Duration) {
    let drained = tokio::time::timeout(grace, async {
        while connect_participant_usecase.active_connections() > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            remaining = connect_participant_usecase.active_connections(),
            "Grace period elapsed with connections still open"
        );
    }
}
