//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if retrying cannot help (server at capacity, unusable URL),
/// `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::ServerBusy | ClientError::InvalidUrl(_))
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Count of consecutive failed attempts after a session ended in an error.
///
/// A session that got past the handshake starts a new run of failures.
pub fn failed_attempts_after(previous: u32, connected: bool) -> u32 {
    if connected { 1 } else { previous.saturating_add(1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_when_server_busy() {
        // テスト項目: サーバーが満員 (503) の場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::ServerBusy;

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_invalid_url() {
        // テスト項目: URL が不正な場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::InvalidUrl("ftp://example".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_when_server_busy() {
        // テスト項目: サーバーが満員の場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ServerBusy;

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_failed_attempts_grow_while_handshake_fails() {
        // テスト項目: ハンドシェイクに失敗し続ける間は失敗回数が増える
        // given (前提条件):
        let previous = 3;

        // when (操作):
        let result = failed_attempts_after(previous, false);

        // then (期待する結果):
        assert_eq!(result, 4);
    }

    #[test]
    fn test_failed_attempts_reset_after_successful_connection() {
        // テスト項目: 一度接続できた後の切断では失敗回数が数え直される
        // given (前提条件): 上限直前まで失敗していた
        let previous = 4;

        // when (操作):
        let result = failed_attempts_after(previous, true);

        // then (期待する結果): 上限に関わらず再接続を続ける
        assert_eq!(result, 1);
        let error = ClientError::ConnectionError("Connection lost".to_string());
        assert!(should_attempt_reconnect(&error, result, 5));
    }
}
