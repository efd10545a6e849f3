//! Shared utilities: logging setup, timestamps, ID generation.

pub mod logger;
pub mod time;
