//! Room history over HTTP.

use studyroom_server::infrastructure::dto::http::ChatLogsResponse;

use crate::{endpoint::history_url, error::ClientError};

/// Fetch every message of a room, oldest first
pub async fn fetch_history(
    http: &reqwest::Client,
    base_url: &str,
    room_id: i64,
) -> Result<Vec<String>, ClientError> {
    let url = history_url(base_url, room_id)?;
    tracing::debug!("Fetching history from {}", url);

    let response: ChatLogsResponse = http
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response.logs)
}
