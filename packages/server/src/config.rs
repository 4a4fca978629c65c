//! Server configuration.
//!
//! Every option is a command line flag that can also be set through a
//! `STUDYROOM_*` environment variable.

use std::time::Duration;

use clap::{Parser, builder::RangedU64ValueParser};

use crate::infrastructure::message_pusher::OutboxLimits;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "studyroom-server", version)]
#[command(about = "Real-time chat rooms for study groups", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "STUDYROOM_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "STUDYROOM_PORT", default_value = "8000")]
    pub port: u16,

    /// Maximum number of concurrent chat connections across all rooms
    #[arg(
        long,
        env = "STUDYROOM_MAX_CONNECTIONS",
        default_value = "1024",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_connections: usize,

    /// Messages queued per connection before a write pending for the send
    /// timeout drops it
    #[arg(
        long,
        env = "STUDYROOM_OUTBOX_CAPACITY",
        default_value = "64",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub outbox_capacity: usize,

    /// Bytes queued per connection before it is dropped
    #[arg(
        long,
        env = "STUDYROOM_OUTBOX_MAX_BYTES",
        default_value = "4194304",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub outbox_max_bytes: usize,

    /// Upper bound for writing one frame to a peer, in milliseconds
    #[arg(long, env = "STUDYROOM_SEND_TIMEOUT_MS", default_value = "5000")]
    pub send_timeout_ms: u64,

    /// Largest accepted inbound message, in bytes
    #[arg(
        long,
        env = "STUDYROOM_MAX_MESSAGE_BYTES",
        default_value = "65536",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_message_bytes: usize,

    /// Time allowed for open connections to close on shutdown, in milliseconds
    #[arg(long, env = "STUDYROOM_SHUTDOWN_GRACE_MS", default_value = "5000")]
    pub shutdown_grace_ms: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "STUDYROOM_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_connections: 1024,
            outbox_capacity: 64,
            outbox_max_bytes: 4 * 1024 * 1024,
            send_timeout_ms: 5000,
            max_message_bytes: 64 * 1024,
            shutdown_grace_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Per-connection outbox limits. The byte limit never drops below one
    /// maximum-size message.
    pub fn outbox_limits(&self) -> OutboxLimits {
        OutboxLimits {
            soft_messages: self.outbox_capacity.max(1),
            max_bytes: self.outbox_max_bytes.max(self.max_message_bytes),
            stall_timeout: self.send_timeout(),
        }
    }
}
