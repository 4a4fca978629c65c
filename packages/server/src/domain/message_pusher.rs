//! MessagePusher trait 定義
//!
//! メンバーの送信キュー（outbox）へのメッセージ投入を抽象化します。
//! 具体的な実装は Infrastructure 層が提供します。

use super::{
    entity::Member,
    error::MessagePushError,
    value_object::{ConnectionId, MessageContent},
};

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// キューに投入できたメンバー数
    pub delivered: usize,
    /// 投入に失敗したメンバー（stale として扱う）
    pub stale: Vec<ConnectionId>,
}

/// MessagePusher trait
///
/// 送信は待機しない（ブロックしない）こと。Room のロックを保持したまま
/// 呼び出されるため、遅いクライアントが他のメンバーへの配信を止めてはならない。
pub trait MessagePusher: Send + Sync {
    /// 1 メンバーの送信キューにメッセージを投入
    fn push_to(&self, member: &Member, content: &MessageContent) -> Result<(), MessagePushError>;

    /// 複数メンバーにメッセージを投入
    ///
    /// 一部の失敗はブロードキャスト全体を失敗させない。
    fn broadcast(&self, members: &[Member], content: &MessageContent) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();
        for member in members {
            match self.push_to(member, content) {
                Ok(()) => outcome.delivered += 1,
                Err(e) => outcome.stale.push(e.connection_id()),
            }
        }
        outcome
    }
}
