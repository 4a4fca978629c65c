//! Real-time chat rooms for study groups.
//!
//! Every study owns a chat room addressed by its integer index. Clients join a
//! room over WebSocket, every message is appended to the room's log and fanned
//! out to all members (sender included), and the log stays readable over plain
//! HTTP after everyone has left.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// composition
pub mod bootstrap;
pub mod config;
