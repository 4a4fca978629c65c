//! UseCase: チャット履歴取得
//!
//! 接続していないクライアント（HTTP）からも Room のログを読めるようにする。
//! 読み取り専用で、未知の Room は空のログとして扱う（エラーにしない）。

use std::sync::Arc;

use crate::domain::{LogEntry, RoomId, RoomRegistry};

/// チャット履歴取得のユースケース
pub struct GetChatLogsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetChatLogsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Room のログ全体をログ位置の順で取得
    pub fn execute(&self, room_id: RoomId) -> Vec<LogEntry> {
        self.registry.read_log(room_id)
    }
}
