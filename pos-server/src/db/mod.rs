//! Database Module
//!
//! Store contracts for bills and shifts plus their two backends:
//!
//! - [`SurrealStore`] - embedded SurrealDB (RocksDB engine)
//! - [`MemoryStore`] - in-process store for tests and `STORE_BACKEND=memory`
//!
//! Services only see `Arc<dyn BillStore>` / `Arc<dyn ShiftStore>`.

pub mod memory;
pub mod surreal;

pub use memory::MemoryStore;
pub use surreal::SurrealStore;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Bill, Shift};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store call timed out: {0}")]
    Timeout(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // unique index violation
        if msg.contains("already contains") || msg.contains("already exists") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Timeout(op) => AppError::timeout(format!("Store call timed out: {op}")),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Time window over Unix millis
///
/// `start` is always inclusive; `end_inclusive` says whether `end` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
    pub end_inclusive: bool,
}

impl TimeRange {
    /// `[start, end)`
    pub fn half_open(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            end_inclusive: false,
        }
    }

    /// `[start, end]`
    pub fn inclusive(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            end_inclusive: true,
        }
    }

    pub fn contains(&self, millis: i64) -> bool {
        millis >= self.start
            && if self.end_inclusive {
                millis <= self.end
            } else {
                millis < self.end
            }
    }
}

/// Bill record store
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Insert a new bill; `Duplicate` when the invoice number is taken
    async fn insert(&self, bill: Bill) -> RepoResult<Bill>;

    async fn find_by_invoice(&self, invoice_number: &str) -> RepoResult<Option<Bill>>;

    /// Bills created inside `range`, oldest first
    async fn find_in_range(&self, range: TimeRange) -> RepoResult<Vec<Bill>>;

    /// Bills stamped with `shift_id`, oldest first
    async fn find_by_shift(&self, shift_id: i64) -> RepoResult<Vec<Bill>>;

    /// Page of bills, newest first
    async fn list(&self, limit: usize, offset: usize) -> RepoResult<Vec<Bill>>;

    /// Replace a stored bill; `NotFound` when its id is unknown
    async fn update(&self, bill: Bill) -> RepoResult<Bill>;
}

/// Shift record store
#[async_trait]
pub trait ShiftStore: Send + Sync {
    /// Insert a new shift; `Duplicate` when it is OPEN and the cashier
    /// already has an OPEN shift
    async fn insert(&self, shift: Shift) -> RepoResult<Shift>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Shift>>;

    async fn find_open_by_cashier(&self, cashier_name: &str) -> RepoResult<Option<Shift>>;

    /// Shifts whose `start_time` is inside `range`, newest first
    async fn find_in_range(&self, range: TimeRange) -> RepoResult<Vec<Shift>>;

    /// Page of shifts, newest first
    async fn list(&self, limit: usize, offset: usize) -> RepoResult<Vec<Shift>>;

    async fn update(&self, shift: Shift) -> RepoResult<Shift>;
}

/// Run a store call with a deadline
pub async fn with_timeout<T, F>(timeout: Duration, op: &'static str, fut: F) -> RepoResult<T>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(op, timeout_ms = timeout.as_millis() as u64, "Store call timed out");
            Err(RepoError::Timeout(op.to_string()))
        }
    }
}
