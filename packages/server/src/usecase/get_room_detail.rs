//! UseCase: Room 詳細取得

use std::sync::Arc;

use crate::domain::{RoomDetail, RoomId, RoomRegistry};

use super::error::GetRoomDetailError;

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Room の詳細を取得
    ///
    /// # Returns
    ///
    /// * `Ok(RoomDetail)` - メンバー一覧とログ件数
    /// * `Err(GetRoomDetailError::RoomNotFound)` - 一度も参照されていない Room
    pub fn execute(&self, room_id: RoomId) -> Result<RoomDetail, GetRoomDetailError> {
        self.registry
            .room(room_id)
            .ok_or(GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockRoomRegistry, Timestamp};

    #[test]
    fn test_get_room_detail_not_found() {
        // テスト項目: 未知の Room は RoomNotFound を返す
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_room().returning(|_| None);
        let usecase = GetRoomDetailUseCase::new(Arc::new(registry));

        // when (操作):
        let result = usecase.execute(RoomId::new(5));

        // then (期待する結果):
        assert_eq!(result, Err(GetRoomDetailError::RoomNotFound));
    }

    #[test]
    fn test_get_room_detail_found() {
        // テスト項目: 既知の Room は詳細を返す
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_room().returning(|room_id| {
            Some(RoomDetail {
                id: room_id,
                members: Vec::new(),
                messages: 2,
                created_at: Timestamp::new(10),
            })
        });
        let usecase = GetRoomDetailUseCase::new(Arc::new(registry));

        // when (操作):
        let result = usecase.execute(RoomId::new(5));

        // then (期待する結果):
        let detail = result.unwrap();
        assert_eq!(detail.id, RoomId::new(5));
        assert_eq!(detail.messages, 2);
    }
}
