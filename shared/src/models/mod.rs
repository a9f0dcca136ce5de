//! Data models
//!
//! Shared between pos-server and register clients (via API).
//! All IDs are `i64` snowflakes, all timestamps Unix millis.

pub mod bill;
pub mod report;
pub mod shift;

// Re-exports
pub use bill::*;
pub use report::*;
pub use shift::*;
