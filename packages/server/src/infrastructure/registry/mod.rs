//! Room Registry の実装
//!
//! - `inmemory`: プロセス内メモリに保持する実装

pub mod inmemory;

pub use inmemory::InMemoryRoomRegistry;
