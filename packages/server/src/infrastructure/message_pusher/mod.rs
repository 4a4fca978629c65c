//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `channel`: 接続ごとの送信キューに上限を課す実装

pub mod channel;

pub use channel::{ChannelMessagePusher, OutboxLimits};
