//! 接続ごとの送信キュー（outbox）
//!
//! Registry は送信側 `PusherChannel` を、接続の writer タスクは受信側
//! `OutboxReceiver` を保持します。キューに溜まっているメッセージ数・バイト数と、
//! writer が現在の書き込みをいつ開始したかを両者で共有し、
//! 「溜まっているだけ」の接続と「書き込みが止まっている」接続を区別できるようにします。

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use tokio::sync::mpsc;

use super::value_object::MessageContent;

/// 書き込み中でないことを表す値
const IDLE: u64 = 0;

#[derive(Debug)]
struct OutboxGauge {
    /// `write_started` の基準時刻
    epoch: Instant,
    queued_messages: AtomicUsize,
    queued_bytes: AtomicUsize,
    /// 書き込み開始時刻（epoch からのミリ秒 + 1）。`IDLE` なら書き込み中ではない
    write_started: AtomicU64,
}

impl OutboxGauge {
    fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX - 1)
    }

    fn dequeued(&self, content: &MessageContent) {
        self.queued_messages.fetch_sub(1, Ordering::AcqRel);
        self.queued_bytes.fetch_sub(content.len(), Ordering::AcqRel);
    }
}

/// 新しい送信キューを作成
pub fn outbox() -> (PusherChannel, OutboxReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let gauge = Arc::new(OutboxGauge {
        epoch: Instant::now(),
        queued_messages: AtomicUsize::new(0),
        queued_bytes: AtomicUsize::new(0),
        write_started: AtomicU64::new(IDLE),
    });

    (
        PusherChannel {
            tx,
            gauge: gauge.clone(),
        },
        OutboxReceiver { rx, gauge },
    )
}

/// 送信キューの送信側
///
/// 容量の判定は `MessagePusher` 実装が行う。このチャンネル自体は待機しない。
#[derive(Debug, Clone)]
pub struct PusherChannel {
    tx: mpsc::UnboundedSender<MessageContent>,
    gauge: Arc<OutboxGauge>,
}

impl PusherChannel {
    /// メッセージを投入する。受信側が閉じていればメッセージを返す
    pub fn send(&self, content: MessageContent) -> Result<(), MessageContent> {
        let length = content.len();
        self.gauge.queued_messages.fetch_add(1, Ordering::AcqRel);
        self.gauge.queued_bytes.fetch_add(length, Ordering::AcqRel);

        self.tx.send(content).map_err(|e| {
            self.gauge.dequeued(&e.0);
            e.0
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// まだ writer に取り出されていないメッセージ数
    pub fn queued_messages(&self) -> usize {
        self.gauge.queued_messages.load(Ordering::Acquire)
    }

    /// まだ writer に取り出されていないバイト数
    pub fn queued_bytes(&self) -> usize {
        self.gauge.queued_bytes.load(Ordering::Acquire)
    }

    /// 実行中の書き込みの経過時間（書き込み中でなければ `None`）
    pub fn write_pending_for(&self) -> Option<Duration> {
        match self.gauge.write_started.load(Ordering::Acquire) {
            IDLE => None,
            started => {
                let now = self.gauge.elapsed_millis();
                Some(Duration::from_millis(now.saturating_sub(started - 1)))
            }
        }
    }
}

/// 送信キューの受信側（writer タスクが保持する）
#[derive(Debug)]
pub struct OutboxReceiver {
    rx: mpsc::UnboundedReceiver<MessageContent>,
    gauge: Arc<OutboxGauge>,
}

impl OutboxReceiver {
    /// 次のメッセージを待つ。送信側が全て破棄されキューが空なら `None`
    pub async fn recv(&mut self) -> Option<MessageContent> {
        let content = self.rx.recv().await?;
        self.gauge.dequeued(&content);
        Some(content)
    }

    /// 待機せずに次のメッセージを取り出す
    pub fn try_recv(&mut self) -> Result<MessageContent, mpsc::error::TryRecvError> {
        let content = self.rx.try_recv()?;
        self.gauge.dequeued(&content);
        Ok(content)
    }

    /// 書き込みの開始を記録する。戻り値が Drop されると書き込み終了として扱う
    pub fn begin_write(&self) -> WriteInProgress {
        let started = self.gauge.elapsed_millis() + 1;
        self.gauge.write_started.store(started, Ordering::Release);
        WriteInProgress {
            gauge: self.gauge.clone(),
        }
    }
}

/// 実行中の書き込み
#[derive(Debug)]
pub struct WriteInProgress {
    gauge: Arc<OutboxGauge>,
}

impl Drop for WriteInProgress {
    fn drop(&mut self) {
        self.gauge.write_started.store(IDLE, Ordering::Release);
    }
}
