//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{
    domain::{failed_attempts_after, should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    formatter::MessageFormatter,
    history::fetch_history,
    session::{connect_room, run_session},
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
///
/// # Arguments
///
/// * `url` - Base WebSocket URL of the server (e.g. `ws://127.0.0.1:8000`)
/// * `room_id` - Room to join
/// * `show_history` - Print the room's history before joining
pub async fn run_client(url: String, room_id: i64, show_history: bool) -> Result<(), ClientError> {
    if show_history {
        let http = reqwest::Client::new();
        let logs = fetch_history(&http, &url, room_id).await?;
        print!("{}", MessageFormatter::format_history(room_id, &logs));
    }

    let mut input = spawn_line_reader(room_id);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} room {} (attempt {}/{})",
            url,
            room_id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let (connected, result) = match connect_room(&url, room_id).await {
            Ok(ws_stream) => (true, run_session(ws_stream, room_id, &mut input).await),
            Err(e) => (false, Err(e)),
        };

        match result {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count = failed_attempts_after(reconnect_count, connected);

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}
