//! Time-related utilities with clock abstraction for testability.
//!
//! Timestamps are Unix milliseconds. They are rendered in Korea Standard
//! Time (UTC+9), the timezone the study group application is used in.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// KST offset in seconds (UTC+9).
const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_kst_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

fn kst_offset() -> FixedOffset {
    FixedOffset::east_opt(KST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Get current Unix timestamp (milliseconds)
///
/// The value is timezone independent; the name reflects that every rendering
/// of it happens in KST.
pub fn get_kst_timestamp() -> i64 {
    Utc::now().with_timezone(&kst_offset()).timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to KST RFC 3339 format
///
/// Out-of-range timestamps render as the Unix epoch.
pub fn timestamp_to_kst_rfc3339(timestamp_millis: i64) -> String {
    let utc = DateTime::<Utc>::from_timestamp_millis(timestamp_millis).unwrap_or_default();
    utc.with_timezone(&kst_offset()).to_rfc3339()
}
