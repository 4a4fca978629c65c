//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::admit() / execute() メソッド
//! - Registration による登録解除（明示的な release と Drop）
//!
//! ### なぜこのテストが必要か
//! - 同時接続数の上限を超えた接続を拒否できることを保証
//! - どの終了経路でも登録解除がちょうど一度だけ行われることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続の受付と Room への登録
//! - 異常系：同時接続数の上限超過、停止処理中の接続
//! - エッジケース：release の二重呼び出し、release せずに Drop

use std::sync::Arc;

use studyroom_shared::time::Clock;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use crate::domain::{ConnectionId, Member, PusherChannel, RoomId, RoomRegistry, Timestamp};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Registry（Room のメンバーシップとログ）
    registry: Arc<dyn RoomRegistry>,
    /// 接続時刻の取得元
    clock: Arc<dyn Clock>,
    /// 同時接続数の上限を管理するセマフォ
    admission: Arc<Semaphore>,
    /// 同時接続数の上限
    max_connections: usize,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        clock: Arc<dyn Clock>,
        max_connections: usize,
    ) -> Self {
        let max_connections = max_connections.min(Semaphore::MAX_PERMITS);
        Self {
            registry,
            clock,
            admission: Arc::new(Semaphore::new(max_connections)),
            max_connections,
        }
    }

    /// 接続を受け付けるかを判定（ハンドシェイク前に呼ぶ）
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - 接続枠。接続が終わるまで保持する
    /// * `Err(ConnectError)` - 上限超過または停止処理中
    pub fn admit(&self) -> Result<Admission, ConnectError> {
        match self.admission.clone().try_acquire_owned() {
            Ok(permit) => Ok(Admission { _permit: permit }),
            Err(TryAcquireError::NoPermits) => Err(ConnectError::CapacityExceeded {
                max: self.max_connections,
            }),
            Err(TryAcquireError::Closed) => Err(ConnectError::ShuttingDown),
        }
    }

    /// 新規接続の受付を停止する
    pub fn close_admission(&self) {
        self.admission.close();
    }

    /// 参加者接続を実行（ハンドシェイク完了後に呼ぶ）
    ///
    /// # Arguments
    ///
    /// * `admission` - `admit` で得た接続枠
    /// * `room_id` - 参加する Room（スタディの存在は確認しない）
    /// * `outbox` - この接続への送信キュー
    ///
    /// # Returns
    ///
    /// 登録を表す `Registration`。Drop されると登録解除される。
    pub fn execute(
        &self,
        admission: Admission,
        room_id: RoomId,
        outbox: PusherChannel,
    ) -> Registration {
        let connection_id = ConnectionId::generate();
        let connected_at = Timestamp::new(self.clock.now_millis());

        self.registry
            .register(room_id, Member::new(connection_id, connected_at, outbox));

        tracing::info!(
            room_id = %room_id,
            connection_id = %connection_id,
            "Participant joined room"
        );

        Registration {
            registry: self.registry.clone(),
            room_id,
            connection_id,
            connected_at,
            admission: Some(admission),
        }
    }

    /// 現在の接続数
    pub fn active_connections(&self) -> usize {
        self.registry.connection_count()
    }
}

/// 接続枠
///
/// Drop されると枠が解放される。
#[derive(Debug)]
pub struct Admission {
    _permit: OwnedSemaphorePermit,
}

/// Room への登録
///
/// 接続ハンドラが所有し、`release` または Drop のどちらか最初の一回だけ
/// Registry から登録解除する。パニックやタスクの中断でも登録解除は行われる。
pub struct Registration {
    registry: Arc<dyn RoomRegistry>,
    room_id: RoomId,
    connection_id: ConnectionId,
    connected_at: Timestamp,
    /// `None` なら解除済み
    admission: Option<Admission>,
}

impl Registration {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn is_released(&self) -> bool {
        self.admission.is_none()
    }

    /// 登録解除して接続枠を返す
    ///
    /// 二度目以降の呼び出しは何もしない。Registry から実際に削除した場合に `true`。
    /// stale として既に外されていた場合は `false`。
    pub fn release(&mut self) -> bool {
        let Some(admission) = self.admission.take() else {
            return false;
        };

        let removed = self.registry.deregister(self.room_id, self.connection_id);
        drop(admission);

        tracing::info!(
            room_id = %self.room_id,
            connection_id = %self.connection_id,
            removed,
            "Participant left room"
        );
        removed
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockRoomRegistry;
    use studyroom_shared::time::FixedClock;
    use crate::domain::outbox;

    const NOW: i64 = 1_700_000_000_000;

    fn create_usecase(registry: MockRoomRegistry, max_connections: usize) -> ConnectParticipantUseCase {
        ConnectParticipantUseCase::new(
            Arc::new(registry),
            Arc::new(FixedClock::new(NOW)),
            max_connections,
        )
    }

    fn permissive_registry() -> MockRoomRegistry {
        let mut registry = MockRoomRegistry::new();
        registry.expect_register().returning(|_, _| ());
        registry.expect_deregister().returning(|_, _| true);
        registry
    }

    #[test]
    fn test_connect_participant_registers_member() {
        // テスト項目: 接続すると Room にメンバーとして登録される
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry
            .expect_register()
            .withf(|room_id, member| {
                *room_id == RoomId::new(7) && member.connected_at == Timestamp::new(NOW)
            })
            .times(1)
            .returning(|_, _| ());
        registry.expect_deregister().returning(|_, _| true);
        let usecase = create_usecase(registry, 10);

        // when (操作):
        let admission = usecase.admit().unwrap();
        let (tx, _rx) = outbox();
        let registration = usecase.execute(admission, RoomId::new(7), tx);

        // then (期待する結果):
        assert_eq!(registration.room_id(), RoomId::new(7));
        assert_eq!(registration.connected_at(), Timestamp::new(NOW));
        assert!(!registration.is_released());
    }

    #[test]
    fn test_release_deregisters_exactly_once() {
        // テスト項目: release を二度呼んでも、Drop されても登録解除は一度だけ
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_register().returning(|_, _| ());
        registry
            .expect_deregister()
            .withf(|room_id, _| *room_id == RoomId::new(7))
            .times(1)
            .returning(|_, _| true);
        let usecase = create_usecase(registry, 10);
        let (tx, _rx) = outbox();
        let mut registration = usecase.execute(usecase.admit().unwrap(), RoomId::new(7), tx);

        // when (操作):
        let first = registration.release();
        let second = registration.release();
        drop(registration);

        // then (期待する結果): deregister の呼び出し回数は MockRoomRegistry が検証する
        assert!(first);
        assert!(!second);
    }

    #[test]
    fn test_drop_without_release_deregisters() {
        // テスト項目: release せずに Drop された場合も登録解除される
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_register().returning(|_, _| ());
        registry.expect_deregister().times(1).returning(|_, _| true);
        let usecase = create_usecase(registry, 10);
        let (tx, _rx) = outbox();
        let registration = usecase.execute(usecase.admit().unwrap(), RoomId::new(1), tx);

        // when (操作):
        drop(registration);

        // then (期待する結果): deregister の呼び出し回数は MockRoomRegistry が検証する
    }

    #[test]
    fn test_admit_capacity_exceeded() {
        // テスト項目: 同時接続数の上限を超えると接続が拒否される
        // given (前提条件):
        let usecase = create_usecase(permissive_registry(), 2);
        let _first = usecase.admit().unwrap();
        let _second = usecase.admit().unwrap();

        // when (操作):
        let result = usecase.admit();

        // then (期待する結果):
        assert_eq!(
            result.map(|_| ()),
            Err(ConnectError::CapacityExceeded { max: 2 })
        );
    }

    #[test]
    fn test_release_returns_admission() {
        // テスト項目: 登録解除すると接続枠が解放され、次の接続を受け付けられる
        // given (前提条件):
        let usecase = create_usecase(permissive_registry(), 1);
        let (tx, _rx) = outbox();
        let mut registration = usecase.execute(usecase.admit().unwrap(), RoomId::new(7), tx);
        assert!(usecase.admit().is_err());

        // when (操作):
        registration.release();

        // then (期待する結果):
        assert!(usecase.admit().is_ok());
    }

    #[test]
    fn test_admit_after_close_is_shutting_down() {
        // テスト項目: 受付停止後の接続は ShuttingDown で拒否される
        // given (前提条件):
        let usecase = create_usecase(permissive_registry(), 10);

        // when (操作):
        usecase.close_admission();
        let result = usecase.admit();

        // then (期待する結果):
        assert_eq!(result.map(|_| ()), Err(ConnectError::ShuttingDown));
    }

    #[test]
    fn test_active_connections_reads_registry() {
        // テスト項目: 現在の接続数は Registry の値を返す
        // given (前提条件):
        let mut registry = MockRoomRegistry::new();
        registry.expect_connection_count().return_const(3usize);
        let usecase = create_usecase(registry, 10);

        // when (操作):
        let count = usecase.active_connections();

        // then (期待する結果):
        assert_eq!(count, 3);
    }
}
