//! Bill Model (one record per completed sale)

use serde::{Deserialize, Serialize};

/// Senior citizen / PWD discount rate applied to `total_amount`
pub const SENIOR_PWD_DISCOUNT_RATE: f64 = 0.20;

/// Line item stored on a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Item name snapshot
    pub item: String,
    /// Quantity sold
    pub qty: i32,
    /// Unit price
    pub price: f64,
}

/// Bill record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: i64,
    /// Human-visible invoice number (unique)
    pub invoice_number: String,
    /// Operator who rang the sale
    pub cashier_name: String,
    pub customer_name: Option<String>,
    pub customer_number: Option<String>,
    /// Payment mode label (cash, card, ...)
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub vat_sales: f64,
    #[serde(default)]
    pub vat_amount: f64,
    /// Cash tendered
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub total_amount: f64,
    /// Senior/PWD discount, informational only (never subtracted from `total_amount`)
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub is_senior_or_pwd: bool,
    /// Shift this sale belongs to; absent on bills rung outside any shift
    pub shift_id: Option<i64>,
    /// Soft-delete flag
    #[serde(default)]
    pub voided: bool,
    /// When the bill was voided (Unix millis)
    pub voided_at: Option<i64>,
    /// Creation time (Unix millis), immutable
    pub created_at: i64,
}

/// Cart line as submitted by the register
///
/// `qty` is optional here so a missing quantity can be reported as a
/// validation failure instead of a decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemInput {
    #[serde(default)]
    pub item: String,
    pub qty: Option<i32>,
    #[serde(default)]
    pub price: f64,
}

/// Create bill payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillCreate {
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub cashier_name: String,
    pub customer_name: Option<String>,
    pub customer_number: Option<String>,
    pub payment_mode: Option<String>,
    pub cart_items: Vec<CartItemInput>,
    #[serde(default)]
    pub sub_total: f64,
    #[serde(default)]
    pub vat_sales: f64,
    #[serde(default)]
    pub vat_amount: f64,
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub total_amount: f64,
    /// Senior citizen / PWD eligibility
    #[serde(default)]
    pub is_senior_or_pwd: bool,
    /// Explicit shift reference; defaults to the cashier's open shift
    pub shift_id: Option<i64>,
}

/// Void bill payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillVoid {
    pub invoice_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_bill_defaults_to_not_voided() {
        let json = r#"{
            "id": 1,
            "invoice_number": "INV-001",
            "cashier_name": "Ana",
            "total_amount": 150.5,
            "created_at": 1700000000000
        }"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert!(!bill.voided);
        assert!(bill.voided_at.is_none());
        assert!(bill.shift_id.is_none());
        assert!(bill.cart_items.is_empty());
        assert_eq!(bill.discount, 0.0);
        assert_eq!(bill.total_amount, 150.5);
    }

    #[test]
    fn create_payload_keeps_missing_qty_as_none() {
        let json = r#"{
            "invoice_number": "INV-002",
            "cashier_name": "Ana",
            "cart_items": [{ "item": "Rice", "price": 50 }],
            "total_amount": 50
        }"#;
        let create: BillCreate = serde_json::from_str(json).unwrap();
        assert_eq!(create.cart_items.len(), 1);
        assert!(create.cart_items[0].qty.is_none());
        assert!(!create.is_senior_or_pwd);
    }

    #[test]
    fn create_payload_rejects_non_list_cart() {
        let json = r#"{
            "invoice_number": "INV-003",
            "cart_items": "rice",
            "total_amount": 50
        }"#;
        assert!(serde_json::from_str::<BillCreate>(json).is_err());
    }
}
