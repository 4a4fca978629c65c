//! InMemory Room Registry 実装
//!
//! ドメイン層が定義する RoomRegistry trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの粒度
//!
//! 外側の `RwLock` は Room の検索と遅延作成のみに使い、各 Room の状態は
//! Room ごとの `Mutex` で保護します。無関係な Room 同士が競合することはありません。
//!
//! ログへの追加・メンバーのスナップショット・送信キューへの投入は同じ Room ロック内で
//! 行うため、同じ Room のメンバーは全員ログ位置の順にメッセージを受け取ります。

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::{Mutex, RwLock};
use studyroom_shared::time::Clock;

use crate::domain::{
    Broadcast, ConnectionId, LogEntry, LogPosition, Member, MessageContent, MessagePusher, Room,
    RoomDetail, RoomId, RoomRegistry, RoomSummary, Timestamp,
};

type RoomSlot = Arc<Mutex<Room>>;

/// インメモリ Room Registry 実装
pub struct InMemoryRoomRegistry {
    /// Room ID → Room
    rooms: RwLock<HashMap<RoomId, RoomSlot>>,
    /// 送信キューへの投入
    message_pusher: Arc<dyn MessagePusher>,
    /// Room 作成時刻・ログ追加時刻の取得元
    clock: Arc<dyn Clock>,
    /// 全 Room の接続数の合計
    connections: AtomicUsize,
}

impl InMemoryRoomRegistry {
    /// 新しい InMemoryRoomRegistry を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            message_pusher,
            clock,
            connections: AtomicUsize::new(0),
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    fn slot(&self, room_id: RoomId) -> Option<RoomSlot> {
        self.rooms.read().get(&room_id).cloned()
    }

    fn slot_or_create(&self, room_id: RoomId) -> RoomSlot {
        if let Some(slot) = self.slot(room_id) {
            return slot;
        }

        let mut rooms = self.rooms.write();
        rooms
            .entry(room_id)
            .or_insert_with(|| {
                tracing::info!(room_id = %room_id, "Room created");
                Arc::new(Mutex::new(Room::new(room_id, self.now())))
            })
            .clone()
    }

    fn release_connection(&self) {
        self.connections.fetch_sub(1, Ordering::AcqRel);
    }
}

impl RoomRegistry for InMemoryRoomRegistry {
    fn register(&self, room_id: RoomId, member: Member) {
        let connection_id = member.connection_id;
        let slot = self.slot_or_create(room_id);
        let members = {
            let mut room = slot.lock();
            room.add_member(member);
            // counted under the room lock so a concurrent removal never underflows
            self.connections.fetch_add(1, Ordering::AcqRel);
            room.members.len()
        };

        tracing::debug!(
            room_id = %room_id,
            connection_id = %connection_id,
            members,
            "Connection registered"
        );
    }

    fn deregister(&self, room_id: RoomId, connection_id: ConnectionId) -> bool {
        let Some(slot) = self.slot(room_id) else {
            return false;
        };

        let removed = slot.lock().remove_member(&connection_id).is_some();
        if removed {
            self.release_connection();
            tracing::debug!(
                room_id = %room_id,
                connection_id = %connection_id,
                "Connection deregistered"
            );
        }
        removed
    }

    fn snapshot_members(&self, room_id: RoomId) -> Vec<Member> {
        self.slot(room_id)
            .map(|slot| slot.lock().member_snapshot())
            .unwrap_or_default()
    }

    fn append_log(&self, room_id: RoomId, content: MessageContent) -> LogPosition {
        let slot = self.slot_or_create(room_id);
        let now = self.now();
        let mut room = slot.lock();
        room.append(content, now)
    }

    fn read_log(&self, room_id: RoomId) -> Vec<LogEntry> {
        self.slot(room_id)
            .map(|slot| slot.lock().log.clone())
            .unwrap_or_default()
    }

    fn publish(&self, room_id: RoomId, content: MessageContent) -> Broadcast {
        let slot = self.slot_or_create(room_id);
        let now = self.now();
        let mut room = slot.lock();

        let position = room.append(content.clone(), now);
        let members = room.member_snapshot();
        let outcome = self.message_pusher.broadcast(&members, &content);

        // stale なメンバーの送信キューを手放すと、その接続の writer が終了する
        for connection_id in &outcome.stale {
            if room.remove_member(connection_id).is_some() {
                self.release_connection();
                tracing::warn!(
                    room_id = %room_id,
                    connection_id = %connection_id,
                    "Dropped stale connection during broadcast"
                );
            }
        }

        Broadcast {
            position,
            delivered: outcome.delivered,
            stale: outcome.stale,
        }
    }

    fn rooms(&self) -> Vec<RoomSummary> {
        let slots: Vec<RoomSlot> = self.rooms.read().values().cloned().collect();
        let mut summaries: Vec<RoomSummary> =
            slots.iter().map(|slot| slot.lock().summary()).collect();
        summaries.sort_by_key(|summary| summary.id);
        summaries
    }

    fn room(&self, room_id: RoomId) -> Option<RoomDetail> {
        self.slot(room_id).map(|slot| slot.lock().detail())
    }

    fn connection_count(&self) -> usize {
        self.connections.load(Ordering::Acquire)
    }
}
