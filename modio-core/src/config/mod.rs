//! Configuration
//!
//! Slot assignments are supplied once at startup, either as a small TOML
//! text document or, with the `serde` feature, as postcard binary data.

pub mod parser;
pub mod types;

pub use parser::parse_config;
pub use types::*;
