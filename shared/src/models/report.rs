//! Sales Report Models (aggregation and reconciliation results)

use serde::{Deserialize, Serialize};

/// Total over one time window
///
/// Voided bills never contribute to `total_amount`, `bill_count` or
/// `total_discount`; they only show up in the `voided_*` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTotal {
    /// Window start (Unix millis, inclusive)
    pub start: i64,
    /// Window end (Unix millis)
    pub end: i64,
    /// Whether `end` itself belongs to the window
    pub end_inclusive: bool,
    pub total_amount: f64,
    pub bill_count: i64,
    pub voided_count: i64,
    pub voided_amount: f64,
    /// Informational senior/PWD discount sum
    pub total_discount: f64,
}

/// One calendar day of sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub total_amount: f64,
    pub bill_count: i64,
}

/// Per-day totals over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBuckets {
    pub start: i64,
    pub end: i64,
    /// Days with at least one counted bill, ascending
    pub buckets: Vec<DailyBucket>,
    pub grand_total: f64,
}

/// Sales of one cashier on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashierDailySales {
    pub date: String,
    pub cashier_name: String,
    pub total_amount: f64,
    pub bill_count: i64,
}

/// Quantity sold of one item at one price by one cashier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldItemSummary {
    pub cashier_name: String,
    pub item: String,
    pub price: f64,
    pub quantity: i64,
    /// `quantity * price`
    pub line_total: f64,
}

/// Cash drawer reconciliation for one shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftReconciliation {
    pub shift_id: i64,
    pub cashier_name: String,
    /// Business date of `start_time` (YYYY-MM-DD)
    pub date: String,
    pub starting_cash: f64,
    pub ending_cash: Option<f64>,
    /// Non-voided sales attributed to the shift
    pub attributed_sales: f64,
    pub bill_count: i64,
    /// `starting_cash + attributed_sales`
    pub expected_cash: f64,
    /// `expected_cash - ending_cash`; positive is a shortage, none while open
    pub difference: Option<f64>,
    /// Bills matched by cashier name and day while the cashier had several shifts that day
    pub ambiguous_attribution: bool,
    pub closed: bool,
}
