//! Input validation helpers
//!
//! Text length limits and numeric checks shared by the bill and shift
//! services. Receipt printers cap line width, so names stay short.

use crate::utils::{AppError, AppResult};
use shared::error::ErrorCode;

/// Cashier / customer / item names
pub const MAX_NAME_LEN: usize = 200;

/// Invoice numbers, phone numbers, payment mode labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Shift notes
pub const MAX_NOTE_LEN: usize = 500;

/// Upper bound for a single monetary amount
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::required(field, format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(value: &Option<String>, field: &str, max_len: usize) -> AppResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a monetary amount is finite, non-negative and bounded
pub fn validate_amount(value: f64, field: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(
            AppError::with_message(ErrorCode::InvalidAmount, format!("{field} must be a finite number"))
                .with_detail("field", field),
        );
    }
    if value < 0.0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("{field} must be non-negative, got {value}"),
        )
        .with_detail("field", field));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} exceeds maximum allowed amount"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
