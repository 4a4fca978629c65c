//! Message formatting utilities for client display.

use studyroom_shared::time::timestamp_to_kst_rfc3339;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the history printed before joining a room
    pub fn format_history(room_id: i64, logs: &[String]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", RULE));
        output.push_str(&format!("History of room {}:\n", room_id));

        if logs.is_empty() {
            output.push_str("(No messages)\n");
        } else {
            for (position, text) in logs.iter().enumerate() {
                output.push_str(&format!("#{} {}\n", position, text));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a message received from the room
    ///
    /// # Arguments
    ///
    /// * `text` - The message as broadcast by the server
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    pub fn format_chat_message(text: &str, received_at: i64) -> String {
        format!(
            "\n← {}\n  received at {}\n",
            text,
            timestamp_to_kst_rfc3339(received_at)
        )
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_history_with_empty_log() {
        // テスト項目: 履歴が空の場合、適切なメッセージが表示される
        // given (前提条件):
        let logs: Vec<String> = vec![];

        // when (操作):
        let result = MessageFormatter::format_history(99, &logs);

        // then (期待する結果):
        assert!(result.contains("History of room 99:"));
        assert!(result.contains("(No messages)"));
    }

    #[test]
    fn test_format_history_keeps_log_order() {
        // テスト項目: 履歴がログの順序で番号付きで表示される
        // given (前提条件):
        let logs = vec!["hello".to_string(), "world".to_string()];

        // when (操作):
        let result = MessageFormatter::format_history(7, &logs);

        // then (期待する結果):
        let hello = result.find("#0 hello").unwrap();
        let world = result.find("#1 world").unwrap();
        assert!(hello < world);
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: 受信メッセージが受信時刻付きでフォーマットされる
        // given (前提条件):
        let text = "Hello, world!";
        let received_at = 1672498800000;

        // when (操作):
        let result = MessageFormatter::format_chat_message(text, received_at);

        // then (期待する結果):
        assert!(result.contains("← Hello, world!"));
        assert!(result.contains("received at 2023-01-01T00:00:00+09:00"));
    }

    #[test]
    fn test_format_binary_message() {
        // テスト項目: バイナリメッセージ通知が正しくフォーマットされる
        // given (前提条件):
        let byte_count = 1024;

        // when (操作):
        let result = MessageFormatter::format_binary_message(byte_count);

        // then (期待する結果):
        assert!(result.contains("1024 bytes"));
    }
}
