//! RoomRegistry trait 定義
//!
//! Room のメンバーシップとログを管理するインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 同期について
//!
//! 全ての操作は実装側で Room 単位に排他制御されます。操作は待機しないため
//! 同期 API とし、`Drop` からも登録解除を呼び出せるようにしています。

use super::{
    entity::{Broadcast, LogEntry, Member, RoomDetail, RoomSummary},
    value_object::{ConnectionId, LogPosition, MessageContent, RoomId},
};

/// Room Registry trait
///
/// Room ID から（メンバー集合、ログ）への対応を保持する唯一の情報源。
/// Room は最初の参照時に暗黙的に作成され、プロセスの終了まで破棄されない。
#[cfg_attr(test, mockall::automock)]
pub trait RoomRegistry: Send + Sync {
    /// メンバーを Room に登録（Room が無ければ作成）
    fn register(&self, room_id: RoomId, member: Member);

    /// メンバーを Room から削除
    ///
    /// 存在しない場合は何もしない（冪等）。削除した場合に `true` を返す。
    fn deregister(&self, room_id: RoomId, connection_id: ConnectionId) -> bool;

    /// 現在のメンバー集合のコピーを取得
    fn snapshot_members(&self, room_id: RoomId) -> Vec<Member>;

    /// ログにメッセージを追加し、ログ位置を返す
    fn append_log(&self, room_id: RoomId, content: MessageContent) -> LogPosition;

    /// ログ全体を順序通りに取得（履歴の無い Room は空）
    fn read_log(&self, room_id: RoomId) -> Vec<LogEntry>;

    /// ログへの追加と全メンバーへの配信を一つの Room ロック内で行う
    ///
    /// 配信に失敗したメンバーは同じロック内でメンバー集合から外される。
    fn publish(&self, room_id: RoomId, content: MessageContent) -> Broadcast;

    /// 既知の全 Room の概要を Room ID 順で取得
    fn rooms(&self) -> Vec<RoomSummary>;

    /// Room の詳細を取得（未知の Room は `None`）
    fn room(&self, room_id: RoomId) -> Option<RoomDetail>;

    /// 全 Room の接続数の合計
    fn connection_count(&self) -> usize;
}
