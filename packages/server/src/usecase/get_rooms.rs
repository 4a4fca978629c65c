//! UseCase: Room 一覧取得

use std::sync::Arc;

use crate::domain::{RoomRegistry, RoomSummary};

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// 既知の全 Room の概要を Room ID 順で取得
    pub fn execute(&self) -> Vec<RoomSummary> {
        self.registry.rooms()
    }
}
