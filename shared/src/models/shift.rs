//! Shift Model (班次管理)

use serde::{Deserialize, Serialize};

/// Shift status
///
/// `OPEN` → `CLOSED` is the only transition; a closed shift is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShiftStatus {
    #[default]
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "CLOSED")]
    Closed,
}

/// Shift record - a cashier's timed working session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: i64,
    /// Cashier user id, when known
    pub cashier_id: Option<String>,
    /// Cashier display name (first name)
    pub cashier_name: String,
    #[serde(default)]
    pub status: ShiftStatus,
    /// Shift start time (Unix millis)
    pub start_time: i64,
    /// Shift end time (Unix millis), null if still open
    pub end_time: Option<i64>,
    /// Cash in the drawer when the shift opened
    #[serde(default)]
    pub starting_cash: f64,
    /// Cash counted when the shift closed
    pub ending_cash: Option<f64>,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.status == ShiftStatus::Open
    }
}

/// Open shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftOpen {
    pub cashier_id: Option<String>,
    pub cashier_name: String,
    /// Starting cash amount (default 0)
    #[serde(default)]
    pub starting_cash: f64,
    pub note: Option<String>,
}

/// Close shift payload (cash counted at close)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftClose {
    pub ending_cash: f64,
    pub note: Option<String>,
}

/// Close the cashier's currently open shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCloseCurrent {
    pub cashier_name: String,
    pub ending_cash: f64,
    pub note: Option<String>,
}
