//! WebSocket connection handlers.
//!
//! Each connection runs as two tasks: a reader that turns inbound frames into
//! room broadcasts, and a writer that drains the connection's outbox into the
//! socket. The connection's lifecycle is
//! `Connecting → Open → Closing → Closed`; deregistration from the room
//! happens exactly once when `Closing` begins, whatever ended the connection.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::oneshot, task::JoinHandle};

use crate::{
    domain::{ConnectionId, MessageContent, OutboxReceiver, RoomId, outbox},
    ui::{handler::http::parse_room_id, state::AppState},
    usecase::Admission,
};

/// Why the reader stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InboundEnd {
    /// The client sent a close frame
    ClientClosed,
    /// The stream ended without a close frame
    StreamEnded,
    /// Read error
    ReadFailed,
    /// An inbound message above the size limit
    TooLarge,
    /// A binary frame that is not UTF-8 text
    Malformed,
}

/// What moved the connection into `Closing`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Inbound(InboundEnd),
    Outbound,
    Shutdown,
}

impl Exit {
    /// Close frame to send to the client, if the socket is still writable
    fn close_frame(self) -> Option<CloseFrame> {
        match self {
            Exit::Inbound(InboundEnd::Malformed) => Some(CloseFrame {
                code: close_code::INVALID,
                reason: "binary frame is not valid UTF-8".into(),
            }),
            Exit::Inbound(InboundEnd::TooLarge) => Some(CloseFrame {
                code: close_code::SIZE,
                reason: "message too large".into(),
            }),
            Exit::Shutdown => Some(CloseFrame {
                code: close_code::AWAY,
                reason: "server shutting down".into(),
            }),
            Exit::Inbound(_) | Exit::Outbound => None,
        }
    }
}

/// Whether a read error was caused by the inbound size limit.
///
/// The WebSocket error is opaque here, so this matches the protocol library's
/// capacity messages.
fn is_size_limit_error(error: &axum::Error) -> bool {
    let message = error.to_string();
    message.contains("Message too long")
        || message.contains("Frame too long")
        || message.contains("Space limit exceeded")
}

/// Upgrade a request on `/ws/chat/{room_id}` to a chat connection.
///
/// The room is not checked against the study registry; any integer id opens
/// (or creates) a room. Requests beyond the connection capacity are rejected
/// with `503` before the handshake.
pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let room_id = parse_room_id(&room_id)?;

    let admission = match state.connect_participant_usecase.admit() {
        Ok(admission) => admission,
        Err(e) => {
            tracing::warn!(room_id = %room_id, "Rejecting connection: {}", e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    let settings = state.connection_settings;
    Ok(ws
        .max_message_size(settings.max_message_bytes)
        .on_failed_upgrade(move |e| {
            tracing::warn!(room_id = %room_id, "WebSocket upgrade failed: {}", e);
        })
        .on_upgrade(move |socket| handle_socket(socket, state, room_id, admission)))
}

/// Spawns a task that drains the outbox into the WebSocket sender.
///
/// Every frame write is bounded by `send_timeout`; a peer that does not accept
/// a frame in time ends its own connection. While a write is pending the
/// outbox reports it, so the registry can tell a stalled writer from a busy
/// one. The loop stops when the handler signals `closing` or when the outbox
/// closes because the registry dropped this connection as stale.
fn pusher_loop(
    mut rx: OutboxReceiver,
    mut sender: SplitSink<WebSocket, Message>,
    mut closing: oneshot::Receiver<Option<CloseFrame>>,
    send_timeout: Duration,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let close_frame = loop {
            let next = tokio::select! {
                biased;
                frame = &mut closing => break frame.unwrap_or(None),
                next = rx.recv() => next,
            };
            let Some(content) = next else {
                break Some(CloseFrame {
                    code: close_code::AGAIN,
                    reason: "connection too slow".into(),
                });
            };

            let frame = Message::Text(content.as_str().into());
            let written = {
                let _writing = rx.begin_write();
                tokio::time::timeout(send_timeout, sender.send(frame)).await
            };
            match written {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(connection_id = %connection_id, "Write failed: {}", e);
                    return;
                }
                Err(_) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Write timed out after {:?}",
                        send_timeout
                    );
                    return;
                }
            }
        };

        let close = async {
            if let Some(frame) = close_frame {
                sender.send(Message::Close(Some(frame))).await?;
            }
            sender.close().await
        };
        if let Err(e) = tokio::time::timeout(send_timeout, close)
            .await
            .unwrap_or(Ok(()))
        {
            tracing::debug!(connection_id = %connection_id, "Close handshake failed: {}", e);
        }
    })
}

/// Reads inbound frames and broadcasts each one to the room.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    room_id: RoomId,
    connection_id: ConnectionId,
) -> InboundEnd {
    while let Some(frame) = receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) if is_size_limit_error(&e) => {
                tracing::warn!(
                    connection_id = %connection_id,
                    "Inbound message too large, closing connection: {}",
                    e
                );
                return InboundEnd::TooLarge;
            }
            Err(e) => {
                tracing::warn!(connection_id = %connection_id, "WebSocket error: {}", e);
                return InboundEnd::ReadFailed;
            }
        };

        let content = match frame {
            Message::Text(text) => MessageContent::from(text.as_str()),
            Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => MessageContent::from(text),
                Err(_) => {
                    tracing::warn!(
                        connection_id = %connection_id,
                        "Binary frame is not valid UTF-8, closing connection"
                    );
                    return InboundEnd::Malformed;
                }
            },
            Message::Close(_) => {
                tracing::debug!(connection_id = %connection_id, "Client requested close");
                return InboundEnd::ClientClosed;
            }
            // Ping/pong is handled automatically by the WebSocket protocol
            _ => continue,
        };

        state.send_message_usecase.execute(room_id, content);
    }

    InboundEnd::StreamEnded
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    admission: Admission,
) {
    let settings = state.connection_settings;

    // Connecting → Open
    let (pusher, rx) = outbox();
    let mut registration = state
        .connect_participant_usecase
        .execute(admission, room_id, pusher);
    let connection_id = registration.connection_id();

    let (sender, receiver) = socket.split();
    let (closing_tx, closing_rx) = oneshot::channel();
    let mut send_task = pusher_loop(rx, sender, closing_rx, settings.send_timeout, connection_id);
    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        state.clone(),
        room_id,
        connection_id,
    ));
    let mut shutdown = state.shutdown.clone();

    // Open: whichever side finishes first ends the connection
    let exit = tokio::select! {
        end = &mut recv_task => Exit::Inbound(end.unwrap_or(InboundEnd::ReadFailed)),
        _ = &mut send_task => Exit::Outbound,
        _ = shutdown.wait_for(|stopping| *stopping) => Exit::Shutdown,
    };

    // Closing: stop reading and writing, then leave the room
    recv_task.abort();
    let _ = closing_tx.send(exit.close_frame());
    registration.release();
    tracing::debug!(
        room_id = %room_id,
        connection_id = %connection_id,
        reason = ?exit,
        "Connection closing"
    );

    if exit != Exit::Outbound
        && tokio::time::timeout(settings.send_timeout, &mut send_task)
            .await
            .is_err()
    {
        send_task.abort();
    }

    // Closed
    tracing::debug!(
        room_id = %room_id,
        connection_id = %connection_id,
        "Connection closed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_frame_for_shutdown_is_going_away() {
        // テスト項目: サーバー停止時は 1001 (Going Away) で切断する
        // given (前提条件):
        let exit = Exit::Shutdown;

        // when (操作):
        let frame = exit.close_frame();

        // then (期待する結果):
        assert_eq!(frame.map(|f| f.code), Some(close_code::AWAY));
    }

    #[test]
    fn test_close_frame_for_malformed_frame_is_invalid_payload() {
        // テスト項目: 不正なフレームを受信した場合は 1007 (Invalid Payload) で切断する
        // given (前提条件):
        let exit = Exit::Inbound(InboundEnd::Malformed);

        // when (操作):
        let frame = exit.close_frame();

        // then (期待する結果):
        assert_eq!(frame.map(|f| f.code), Some(close_code::INVALID));
    }

    #[test]
    fn test_close_frame_for_oversized_message_is_message_too_big() {
        // テスト項目: 上限を超えるメッセージを受信した場合は 1009 (Message Too Big) で切断する
        // given (前提条件):
        let error = axum::Error::new(std::io::Error::other(
            "Space limit exceeded: Message too long: 70000 > 65536",
        ));

        // when (操作):
        let end = if is_size_limit_error(&error) {
            InboundEnd::TooLarge
        } else {
            InboundEnd::ReadFailed
        };
        let frame = Exit::Inbound(end).close_frame();

        // then (期待する結果):
        assert_eq!(frame.map(|f| f.code), Some(close_code::SIZE));
    }

    #[test]
    fn test_other_read_errors_are_not_size_limit() {
        // テスト項目: サイズ以外の読み込みエラーは上限超過として扱わない
        // given (前提条件):
        let error = axum::Error::new(std::io::Error::other(
            "Connection reset without closing handshake",
        ));

        // when (操作):
        let too_large = is_size_limit_error(&error);

        // then (期待する結果):
        assert!(!too_large);
    }

    #[test]
    fn test_no_close_frame_when_peer_is_gone() {
        // テスト項目: クライアント側から切断した場合は close フレームを送らない
        // given (前提条件):
        let exits = [
            Exit::Inbound(InboundEnd::ClientClosed),
            Exit::Inbound(InboundEnd::StreamEnded),
            Exit::Inbound(InboundEnd::ReadFailed),
            Exit::Outbound,
        ];

        // when (操作):
        let frames: Vec<Option<CloseFrame>> = exits.iter().map(|e| e.close_frame()).collect();

        // then (期待する結果):
        assert!(frames.iter().all(Option::is_none));
    }
}
