//! Shared types for the POS backend
//!
//! Domain models exchanged over the REST API, the unified error system,
//! and small utilities (timestamps, id generation) used by the server and
//! by any Rust client.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
