//! Server endpoint URLs derived from the base WebSocket URL.

use crate::error::ClientError;

/// WebSocket URL of a room, e.g. `ws://127.0.0.1:8000/ws/chat/7`
pub fn room_socket_url(base_url: &str, room_id: i64) -> String {
    format!("{}/ws/chat/{}", base_url.trim_end_matches('/'), room_id)
}

/// HTTP URL of a room's history, e.g. `http://127.0.0.1:8000/chat/7/logs`
///
/// `ws://` maps to `http://` and `wss://` to `https://`.
pub fn history_url(base_url: &str, room_id: i64) -> Result<String, ClientError> {
    let base = base_url.trim_end_matches('/');
    let http_base = if let Some(rest) = base.strip_prefix("ws://") {
        format!("http://{}", rest)
    } else if let Some(rest) = base.strip_prefix("wss://") {
        format!("https://{}", rest)
    } else {
        return Err(ClientError::InvalidUrl(base_url.to_string()));
    };

    Ok(format!("{}/chat/{}/logs", http_base, room_id))
}
