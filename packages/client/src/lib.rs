//! Terminal chat client for study rooms.

mod domain;
pub mod endpoint;
pub mod error;
mod formatter;
pub mod history;
mod runner;
pub mod session;
mod ui;

pub use runner::run_client;
