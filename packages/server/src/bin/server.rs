//! Study room chat server.
//!
//! Every message a participant sends to `/ws/chat/{room_id}` is appended to
//! the room's log and broadcast to everyone in the room, the sender included.
//! The log can be read back through `/chat/{room_id}/logs`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin studyroom-server
//! cargo run --bin studyroom-server -- --host 0.0.0.0 --port 3000
//! ```

use clap::Parser;

use studyroom_server::{bootstrap::build_server, config::ServerConfig};
use studyroom_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_BIN_NAME"),
        &config.log_level,
    );

    let server = build_server(config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
