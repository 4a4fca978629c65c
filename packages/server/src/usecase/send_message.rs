//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 受信したメッセージが加工されずに Room へ publish されることを確認
//! - stale な接続がいても送信者にエラーが伝播しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - エッジケース：配信中に stale な接続が見つかる

use std::sync::Arc;

use crate::domain::{Broadcast, MessageContent, RoomId, RoomRegistry};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Registry（Room のメンバーシップとログ）
    registry: Arc<dyn RoomRegistry>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// メッセージ送信を実行
    ///
    /// ログへの追加と、送信者を含む Room の全メンバーへの配信を行う。
    /// 配信に失敗したメンバーは Room から外されるだけで、送信者には影響しない。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先の Room
    /// * `content` - メッセージ内容（そのまま保存・配信される）
    pub fn execute(&self, room_id: RoomId, content: MessageContent) -> Broadcast {
        let length = content.len();
        let broadcast = self.registry.publish(room_id, content);

        tracing::debug!(
            room_id = %room_id,
            position = %broadcast.position,
            delivered = broadcast.delivered,
            length,
            "Message broadcast"
        );
        if !broadcast.stale.is_empty() {
            tracing::warn!(
                room_id = %room_id,
                stale = broadcast.stale.len(),
                "Stale connections dropped while broadcasting"
            );
        }

        broadcast
    }
}
