//! UseCase 層のエラー型

use thiserror::Error;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 同時接続数の上限に達している
    #[error("connection capacity exceeded (max {max} concurrent connections)")]
    CapacityExceeded { max: usize },

    /// サーバーが停止処理中
    #[error("server is shutting down")]
    ShuttingDown,
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
