//! Terminal chat client for a study room.
//!
//! Joins a room, prints every message broadcast to it and sends every line
//! typed at the prompt. Automatically reconnects on disconnection (max 5
//! attempts with 5 second interval). A server at capacity ends the client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin studyroom-client -- --room 7
//! cargo run --bin studyroom-client -- -u ws://127.0.0.1:8000 -r 7 --history
//! ```

use clap::Parser;

use studyroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "studyroom-client", version)]
#[command(about = "Terminal chat client for study rooms", long_about = None)]
struct Args {
    /// Base WebSocket URL of the server
    #[arg(
        short = 'u',
        long,
        env = "STUDYROOM_URL",
        default_value = "ws://127.0.0.1:8000"
    )]
    url: String,

    /// Room (study index) to join
    #[arg(short = 'r', long, env = "STUDYROOM_ROOM", allow_negative_numbers = true)]
    room: i64,

    /// Print the room history before joining
    #[arg(long)]
    history: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = studyroom_client::run_client(args.url, args.room, args.history).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
