//! Data Transfer Objects for the HTTP API.

pub mod conversion;
pub mod http;
