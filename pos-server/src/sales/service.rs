//! Sales Service
//!
//! Bill creation, voiding and the sales totals built on [`super::aggregate`].
//! Every store call carries the configured store timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::ErrorCode;
use shared::models::{
    Bill, BillCreate, CartItem, CashierDailySales, DailyBuckets, SalesTotal, SoldItemSummary,
};

use super::aggregate;
use super::money::senior_discount;
use crate::audit_log;
use crate::db::{BillStore, RepoError, RepoResult, ShiftStore, TimeRange, with_timeout};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

#[derive(Clone)]
pub struct SalesService {
    bills: Arc<dyn BillStore>,
    shifts: Arc<dyn ShiftStore>,
    tz: Tz,
    store_timeout: Duration,
}

impl SalesService {
    pub fn new(
        bills: Arc<dyn BillStore>,
        shifts: Arc<dyn ShiftStore>,
        tz: Tz,
        store_timeout: Duration,
    ) -> Self {
        Self {
            bills,
            shifts,
            tz,
            store_timeout,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    async fn store<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = RepoResult<T>>,
    ) -> AppResult<T> {
        with_timeout(self.store_timeout, op, fut)
            .await
            .map_err(AppError::from)
    }

    /// Validate and persist a new bill
    ///
    /// `discount` is computed here and never subtracted from `total_amount`.
    pub async fn create_bill(&self, req: BillCreate, now: i64) -> AppResult<Bill> {
        let invoice_number = req
            .invoice_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::required("invoice_number", "Invoice number is required."))?
            .to_string();
        validate_required_text(&invoice_number, "invoice_number", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&req.cashier_name, "cashier_name", MAX_NAME_LEN)?;
        validate_optional_text(&req.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_optional_text(&req.customer_number, "customer_number", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&req.payment_mode, "payment_mode", MAX_SHORT_TEXT_LEN)?;

        let mut cart_items = Vec::with_capacity(req.cart_items.len());
        for (idx, line) in req.cart_items.iter().enumerate() {
            let qty = line.qty.ok_or_else(|| {
                AppError::required("qty", "Quantity (qty) is required for each item.")
                    .with_detail("index", idx)
            })?;
            if qty <= 0 {
                return Err(AppError::with_message(
                    ErrorCode::CartInvalid,
                    format!("Quantity must be positive, got {qty}"),
                )
                .with_detail("index", idx));
            }
            if line.item.trim().is_empty() {
                return Err(AppError::with_message(
                    ErrorCode::CartInvalid,
                    "Item name is required for each item.",
                )
                .with_detail("index", idx));
            }
            validate_amount(line.price, "price")?;
            cart_items.push(CartItem {
                item: line.item.trim().to_string(),
                qty,
                price: line.price,
            });
        }

        for (value, field) in [
            (req.sub_total, "sub_total"),
            (req.vat_sales, "vat_sales"),
            (req.vat_amount, "vat_amount"),
            (req.cash, "cash"),
            (req.change, "change"),
            (req.total_amount, "total_amount"),
        ] {
            validate_amount(value, field)?;
        }

        if self
            .store("bill.find_by_invoice", self.bills.find_by_invoice(&invoice_number))
            .await?
            .is_some()
        {
            return Err(invoice_exists(&invoice_number));
        }

        let shift_id = self.resolve_shift(&req.cashier_name, req.shift_id).await?;

        let bill = Bill {
            id: shared::util::snowflake_id(),
            invoice_number,
            cashier_name: req.cashier_name.trim().to_string(),
            customer_name: req.customer_name,
            customer_number: req.customer_number,
            payment_mode: req.payment_mode,
            cart_items,
            sub_total: req.sub_total,
            vat_sales: req.vat_sales,
            vat_amount: req.vat_amount,
            cash: req.cash,
            change: req.change,
            total_amount: req.total_amount,
            discount: senior_discount(req.total_amount, req.is_senior_or_pwd),
            is_senior_or_pwd: req.is_senior_or_pwd,
            shift_id,
            voided: false,
            voided_at: None,
            created_at: now,
        };

        let bill = match with_timeout(self.store_timeout, "bill.insert", self.bills.insert(bill)).await
        {
            Ok(bill) => bill,
            Err(RepoError::Duplicate(_)) => {
                return Err(invoice_exists(req.invoice_number.as_deref().unwrap_or_default().trim()));
            }
            Err(e) => return Err(e.into()),
        };

        audit_log!(
            bill.cashier_name,
            "create",
            format!("bill:{}", bill.invoice_number),
            format!("total_amount={} discount={}", bill.total_amount, bill.discount)
        );
        Ok(bill)
    }

    /// Explicit shift must be an OPEN shift of the same cashier; otherwise
    /// fall back to the cashier's open shift, if any
    async fn resolve_shift(&self, cashier_name: &str, requested: Option<i64>) -> AppResult<Option<i64>> {
        let cashier_name = cashier_name.trim();
        match requested {
            Some(id) => {
                let shift = self
                    .store("shift.find_by_id", self.shifts.find_by_id(id))
                    .await?
                    .ok_or_else(|| {
                        AppError::validation(format!("Shift {id} does not exist"))
                            .with_detail("shift_id", id)
                    })?;
                if !shift.is_open() || shift.cashier_name != cashier_name {
                    return Err(AppError::validation(format!(
                        "Shift {id} is not an open shift of {cashier_name}"
                    ))
                    .with_detail("shift_id", id));
                }
                Ok(Some(id))
            }
            None => Ok(self
                .store(
                    "shift.find_open_by_cashier",
                    self.shifts.find_open_by_cashier(cashier_name),
                )
                .await?
                .map(|s| s.id)),
        }
    }

    /// Bills newest first; with a range, every bill in it
    pub async fn list_bills(
        &self,
        range: Option<TimeRange>,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Bill>> {
        match range {
            Some(range) => {
                let mut bills = self
                    .store("bill.find_in_range", self.bills.find_in_range(range))
                    .await?;
                bills.reverse();
                Ok(bills)
            }
            None => {
                self.store("bill.list", self.bills.list(limit, offset))
                    .await
            }
        }
    }

    pub async fn get_bill(&self, invoice_number: &str) -> AppResult<Bill> {
        self.store("bill.find_by_invoice", self.bills.find_by_invoice(invoice_number))
            .await?
            .ok_or_else(|| bill_not_found(invoice_number))
    }

    /// Soft-delete a bill; re-voiding is rejected without touching the record
    pub async fn void_bill(&self, invoice_number: &str, now: i64) -> AppResult<Bill> {
        let invoice_number = invoice_number.trim();
        if invoice_number.is_empty() {
            return Err(AppError::required("invoice_number", "Invoice number is required."));
        }

        let mut bill = self.get_bill(invoice_number).await?;
        if bill.voided {
            return Err(AppError::with_message(
                ErrorCode::BillAlreadyVoided,
                format!("Invoice {invoice_number} is already voided"),
            )
            .with_detail("invoice_number", invoice_number));
        }

        bill.voided = true;
        bill.voided_at = Some(now);
        let bill = self.store("bill.update", self.bills.update(bill)).await?;

        audit_log!(
            bill.cashier_name,
            "void",
            format!("bill:{}", bill.invoice_number),
            format!("total_amount={}", bill.total_amount)
        );
        Ok(bill)
    }

    async fn total_for(&self, range: TimeRange) -> AppResult<SalesTotal> {
        let bills = self
            .store("bill.find_in_range", self.bills.find_in_range(range))
            .await?;
        Ok(aggregate::sales_total(&bills, range))
    }

    /// Total for the business day containing `reference`
    pub async fn daily_total(&self, reference: i64) -> AppResult<SalesTotal> {
        let (start, end) = time::day_range(reference, self.tz);
        self.total_for(TimeRange::half_open(start, end)).await
    }

    /// Total for the Sunday-to-Saturday weeks spanning `start..=end`
    pub async fn weekly_total(&self, start: i64, end: i64) -> AppResult<SalesTotal> {
        let (week_start, week_end) = time::week_range(start, end, self.tz)?;
        self.total_for(TimeRange::half_open(week_start, week_end)).await
    }

    /// Total over `[start, end]`, both ends inclusive
    pub async fn monthly_total(&self, start: i64, end: i64) -> AppResult<SalesTotal> {
        if end < start {
            return Err(AppError::validation("End must not be before start"));
        }
        self.total_for(TimeRange::inclusive(start, end)).await
    }

    /// Total for a calendar month
    pub async fn month_total(&self, year: i32, month: u32) -> AppResult<SalesTotal> {
        let (start, end) = time::month_range(year, month, self.tz)?;
        self.monthly_total(start, end).await
    }

    pub async fn daily_buckets(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<DailyBuckets> {
        let (start, end) = time::date_span(start_date, end_date, self.tz)?;
        let range = TimeRange::half_open(start, end);
        let bills = self
            .store("bill.find_in_range", self.bills.find_in_range(range))
            .await?;
        Ok(aggregate::daily_buckets(&bills, range, self.tz))
    }

    pub async fn cashier_daily_sales(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Vec<CashierDailySales>> {
        let (start, end) = time::date_span(start_date, end_date, self.tz)?;
        let range = TimeRange::half_open(start, end);
        let bills = self
            .store("bill.find_in_range", self.bills.find_in_range(range))
            .await?;
        Ok(aggregate::cashier_daily(&bills, range, self.tz))
    }

    pub async fn sold_items(&self, date: NaiveDate) -> AppResult<Vec<SoldItemSummary>> {
        let (start, end) = time::date_span(date, date, self.tz)?;
        let range = TimeRange::half_open(start, end);
        let bills = self
            .store("bill.find_in_range", self.bills.find_in_range(range))
            .await?;
        Ok(aggregate::sold_items(&bills, range))
    }
}

fn invoice_exists(invoice_number: &str) -> AppError {
    AppError::with_message(
        ErrorCode::InvoiceNumberExists,
        format!("Invoice number {invoice_number} already exists"),
    )
    .with_detail("invoice_number", invoice_number)
}

fn bill_not_found(invoice_number: &str) -> AppError {
    AppError::with_message(
        ErrorCode::BillNotFound,
        format!("Invoice {invoice_number} not found"),
    )
    .with_detail("invoice_number", invoice_number)
}
