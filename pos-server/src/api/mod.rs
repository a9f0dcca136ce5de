//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`bills`] - 开票、查询、作废
//! - [`reports`] - 销售汇总与对账报表
//! - [`shifts`] - 班次管理

pub mod bills;
pub mod health;
pub mod reports;
pub mod shifts;

use axum::extract::rejection::JsonRejection;
use shared::error::ErrorCode;

use crate::utils::AppError;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: usize = 50;
/// Upper bound for `limit`
pub const MAX_LIMIT: usize = 500;

pub(crate) fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Body decoding failures are validation errors, not framework rejections
pub(crate) fn body_rejection(rejection: JsonRejection) -> AppError {
    decode_error(rejection.body_text())
}

/// Classify a JSON decoding message
///
/// Decoding messages carry the failing path (`cart_items: ...`,
/// `cart_items[0].qty: ...`), which separates a cart that is not a list from
/// one bad line.
fn decode_error(text: String) -> AppError {
    if text.contains("missing field `cart_items`") || text.contains("cart_items: ") {
        AppError::with_message(ErrorCode::CartInvalid, "Cart items must be an array.")
            .with_detail("reason", text)
    } else if text.contains("cart_items[") {
        AppError::with_message(
            ErrorCode::CartInvalid,
            "Each cart item needs a text item, a whole-number qty and a numeric price.",
        )
        .with_detail("reason", text)
    } else {
        AppError::with_message(ErrorCode::InvalidFormat, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

    #[test]
    fn test_cart_not_a_list() {
        let err = decode_error(format!(
            "{PREFIX}cart_items: invalid type: string \"rice\", expected a sequence at line 1 column 40"
        ));
        assert_eq!(err.code, ErrorCode::CartInvalid);
        assert_eq!(err.message, "Cart items must be an array.");

        let err = decode_error(format!("{PREFIX}missing field `cart_items` at line 1 column 30"));
        assert_eq!(err.message, "Cart items must be an array.");
    }

    #[test]
    fn test_bad_cart_line_is_not_reported_as_non_list() {
        let err = decode_error(format!(
            "{PREFIX}cart_items[0].qty: invalid type: string \"2\", expected i32 at line 1 column 55"
        ));
        assert_eq!(err.code, ErrorCode::CartInvalid);
        assert_ne!(err.message, "Cart items must be an array.");
        assert!(err.details.unwrap()["reason"].as_str().unwrap().contains("qty"));
    }

    #[test]
    fn test_other_decode_errors_are_invalid_format() {
        let err = decode_error(format!(
            "{PREFIX}total_amount: invalid type: string \"abc\", expected f64 at line 1 column 20"
        ));
        assert_eq!(err.code, ErrorCode::InvalidFormat);
    }
}
