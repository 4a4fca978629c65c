//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use studyroom_shared::time::get_kst_timestamp;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{endpoint::room_socket_url, error::ClientError};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

/// An open WebSocket connection to a room
pub type RoomStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a connection to a room.
///
/// # Returns
///
/// * `Ok(RoomStream)` - the handshake completed
/// * `Err(ClientError::ServerBusy)` - the server is at capacity (503)
/// * `Err(ClientError)` - any other handshake failure
pub async fn connect_room(base_url: &str, room_id: i64) -> Result<RoomStream, ClientError> {
    let url = room_socket_url(base_url, room_id);

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response)) if response.status().as_u16() == 503 => {
            return Err(ClientError::ServerBusy);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to {}", url);
    Ok(ws_stream)
}

/// Open a connection to a room and run it until the input closes or the
/// connection is lost.
pub async fn run_client_session(
    base_url: &str,
    room_id: i64,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let ws_stream = connect_room(base_url, room_id).await?;
    run_session(ws_stream, room_id, input).await
}

/// Run an open connection to a room.
///
/// Lines received on `input` are sent as text frames; every message the room
/// broadcasts (own messages included) is printed.
///
/// # Returns
///
/// * `Ok(())` - the input closed (user exit)
/// * `Err(ClientError)` - the connection was lost
pub async fn run_session(
    ws_stream: RoomStream,
    room_id: i64,
    input: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    println!(
        "\nJoined room {}. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        room_id
    );

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted =
                        MessageFormatter::format_chat_message(text.as_str(), get_kst_timestamp());
                    print!("{}", formatted);
                    redisplay_prompt(room_id);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(room_id);
                }
                Ok(Message::Close(frame)) => {
                    match frame {
                        Some(frame) => tracing::info!(
                            "Server closed the connection ({}): {}",
                            u16::from(frame.code),
                            frame.reason.as_str()
                        ),
                        None => tracing::info!("Server closed the connection"),
                    }
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    let write_loop = async {
        while let Some(line) = input.recv().await {
            if let Err(e) = write.send(Message::text(line)).await {
                tracing::warn!("Failed to send message: {}", e);
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }

        // Input closed: leave the room politely
        if let Err(e) = write.close().await {
            tracing::debug!("Close handshake failed: {}", e);
        }
        Ok(())
    };

    // If either side completes, the session is over
    tokio::select! {
        _ = &mut read_task => {
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        write_result = write_loop => {
            read_task.abort();
            write_result
        }
    }
}
