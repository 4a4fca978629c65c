//! 送信キュー（outbox）を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - メンバーの送信キューへの投入（待機しない）
//! - 接続ごとの上限判定と失敗の分類（バイト数超過 / writer 停止 / キュー切断）
//!
//! ## 設計ノート
//!
//! WebSocket への実際の書き込みは UI 層（`src/ui/handler/websocket.rs`）の
//! writer タスクが行います。この実装はキューへの投入のみを担当するため、
//! 遅いクライアントがいても Room のロックを長時間保持することはありません。
//!
//! キューに `soft_messages` 件以上溜まっていても、writer が書き込みを進めている限り
//! 接続は切断しません。切断するのは、溜まっている状態で 1 回の書き込みが
//! `stall_timeout` 以上終わっていない場合と、溜まっているバイト数が
//! `max_bytes` を超える場合だけです。

use std::time::Duration;

use crate::domain::{Member, MessageContent, MessagePushError, MessagePusher};

/// 接続ごとの送信キューの上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboxLimits {
    /// この件数以上溜まると writer の停止を確認する
    pub soft_messages: usize,
    /// 溜めておけるバイト数の上限
    pub max_bytes: usize,
    /// 書き込みがこの時間以上終わらなければ writer が停止しているとみなす
    pub stall_timeout: Duration,
}

impl Default for OutboxLimits {
    fn default() -> Self {
        Self {
            soft_messages: 64,
            max_bytes: 4 * 1024 * 1024,
            stall_timeout: Duration::from_secs(5),
        }
    }
}

/// 送信キューを使った MessagePusher 実装
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelMessagePusher {
    limits: OutboxLimits,
}

impl ChannelMessagePusher {
    pub fn new(limits: OutboxLimits) -> Self {
        Self { limits }
    }

    fn check_limits(
        &self,
        member: &Member,
        content: &MessageContent,
    ) -> Result<(), MessagePushError> {
        let outbox = &member.outbox;

        // 1 件目はサイズに関わらず受け付ける
        let queued_bytes = outbox.queued_bytes();
        if queued_bytes > 0 && queued_bytes + content.len() > self.limits.max_bytes {
            tracing::warn!(
                connection_id = %member.connection_id,
                queued_bytes,
                max_bytes = self.limits.max_bytes,
                "Outbox byte limit exceeded"
            );
            return Err(MessagePushError::OutboxFull(member.connection_id));
        }

        let queued_messages = outbox.queued_messages();
        if queued_messages >= self.limits.soft_messages
            && let Some(pending) = outbox.write_pending_for()
            && pending >= self.limits.stall_timeout
        {
            tracing::warn!(
                connection_id = %member.connection_id,
                queued_messages,
                pending_ms = pending.as_millis() as u64,
                "Writer made no progress, connection is not keeping up"
            );
            return Err(MessagePushError::WriterStalled(member.connection_id));
        }

        Ok(())
    }
}

impl MessagePusher for ChannelMessagePusher {
    fn push_to(&self, member: &Member, content: &MessageContent) -> Result<(), MessagePushError> {
        if member.outbox.is_closed() {
            tracing::debug!(
                connection_id = %member.connection_id,
                "Outbox closed, connection is already shutting down"
            );
            return Err(MessagePushError::OutboxClosed(member.connection_id));
        }

        self.check_limits(member, content)?;

        match member.outbox.send(content.clone()) {
            Ok(()) => {
                tracing::debug!(
                    connection_id = %member.connection_id,
                    "Queued message for connection"
                );
                Ok(())
            }
            Err(_) => {
                tracing::debug!(
                    connection_id = %member.connection_id,
                    "Outbox closed, connection is already shutting down"
                );
                Err(MessagePushError::OutboxClosed(member.connection_id))
            }
        }
    }
}
