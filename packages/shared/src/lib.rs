//! Utilities shared between the study room chat server and client.

pub mod logger;
pub mod time;
