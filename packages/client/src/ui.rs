//! UI utilities for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

/// Prompt shown while waiting for input
pub fn prompt(room_id: i64) -> String {
    format!("room {}> ", room_id)
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(room_id: i64) {
    print!("{}", prompt(room_id));
    std::io::stdout().flush().ok();
}

/// Read lines from the terminal on a dedicated thread.
///
/// The returned channel closes when the user presses Ctrl+C or Ctrl+D. The
/// thread outlives individual connections, so reconnecting keeps the same
/// input.
pub fn spawn_line_reader(room_id: i64) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let line_prompt = prompt(room_id);

        loop {
            match rl.readline(&line_prompt) {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
