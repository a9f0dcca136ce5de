//! Shift Service (班次管理)
//!
//! One OPEN shift per cashier. `OPEN` → `CLOSED` is the only transition.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::ErrorCode;
use shared::models::{Shift, ShiftClose, ShiftOpen, ShiftReconciliation, ShiftStatus};

use super::reconcile;
use crate::audit_log;
use crate::db::{BillStore, RepoError, RepoResult, ShiftStore, TimeRange, with_timeout};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, time};

#[derive(Clone)]
pub struct ShiftService {
    shifts: Arc<dyn ShiftStore>,
    bills: Arc<dyn BillStore>,
    tz: Tz,
    store_timeout: Duration,
}

impl ShiftService {
    pub fn new(
        shifts: Arc<dyn ShiftStore>,
        bills: Arc<dyn BillStore>,
        tz: Tz,
        store_timeout: Duration,
    ) -> Self {
        Self {
            shifts,
            bills,
            tz,
            store_timeout,
        }
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

    /// POST /api/shifts - 开班
    pub async fn open_shift(&self, req: ShiftOpen, now: i64) -> AppResult<Shift> {
        validate_required_text(&req.cashier_name, "cashier_name", MAX_NAME_LEN)?;
        validate_optional_text(&req.cashier_id, "cashier_id", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;
        validate_amount(req.starting_cash, "starting_cash")?;

        let cashier_name = req.cashier_name.trim().to_string();
        if let Some(open) = self.current_shift(&cashier_name).await? {
            return Err(shift_already_open(&cashier_name).with_detail("shift_id", open.id));
        }

        let shift = Shift {
            id: shared::util::snowflake_id(),
            cashier_id: req.cashier_id,
            cashier_name: cashier_name.clone(),
            status: ShiftStatus::Open,
            start_time: now,
            end_time: None,
            starting_cash: req.starting_cash,
            ending_cash: None,
            note: req.note,
            created_at: now,
            updated_at: now,
        };
        // the store rejects a concurrent open that passed the check above
        let shift = match with_timeout(self.store_timeout, "shift.insert", self.shifts.insert(shift))
            .await
        {
            Ok(shift) => shift,
            Err(RepoError::Duplicate(_)) => return Err(shift_already_open(&cashier_name)),
            Err(e) => return Err(e.into()),
        };

        audit_log!(
            shift.cashier_name,
            "open",
            format!("shift:{}", shift.id),
            format!("starting_cash={}", shift.starting_cash)
        );
        Ok(shift)
    }

    /// OPEN → CLOSED
    pub async fn close_shift(&self, id: i64, req: ShiftClose, now: i64) -> AppResult<Shift> {
        validate_amount(req.ending_cash, "ending_cash")?;
        validate_optional_text(&req.note, "note", MAX_NOTE_LEN)?;

        let mut shift = self.get_shift(id).await?;
        if !shift.is_open() {
            return Err(AppError::with_message(
                ErrorCode::ShiftAlreadyClosed,
                format!("Shift {id} is already closed"),
            )
            .with_detail("shift_id", id));
        }

        shift.status = ShiftStatus::Closed;
        shift.end_time = Some(now);
        shift.ending_cash = Some(req.ending_cash);
        if req.note.is_some() {
            shift.note = req.note;
        }
        shift.updated_at = now;
        let shift = self.store("shift.update", self.shifts.update(shift)).await?;

        audit_log!(
            shift.cashier_name,
            "close",
            format!("shift:{}", shift.id),
            format!("ending_cash={}", req.ending_cash)
        );
        Ok(shift)
    }

    /// Close whichever shift the cashier has open
    pub async fn close_current_shift(
        &self,
        cashier_name: &str,
        req: ShiftClose,
        now: i64,
    ) -> AppResult<Shift> {
        let open = self.current_shift(cashier_name).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::NoOpenShift,
                format!("{} has no open shift", cashier_name.trim()),
            )
            .with_detail("cashier_name", cashier_name.trim())
        })?;
        self.close_shift(open.id, req, now).await
    }

    pub async fn current_shift(&self, cashier_name: &str) -> AppResult<Option<Shift>> {
        self.store(
            "shift.find_open_by_cashier",
            self.shifts.find_open_by_cashier(cashier_name.trim()),
        )
        .await
    }

    pub async fn get_shift(&self, id: i64) -> AppResult<Shift> {
        self.store("shift.find_by_id", self.shifts.find_by_id(id))
            .await?
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ShiftNotFound, format!("Shift {id} not found"))
                    .with_detail("shift_id", id)
            })
    }

    pub async fn list_shifts(&self, limit: usize, offset: usize) -> AppResult<Vec<Shift>> {
        self.store("shift.list", self.shifts.list(limit, offset))
            .await
    }

    /// Shifts started on `date` (business day), newest first
    pub async fn shifts_by_date(&self, date: NaiveDate) -> AppResult<Vec<Shift>> {
        let (start, end) = time::date_span(date, date, self.tz)?;
        self.store(
            "shift.find_in_range",
            self.shifts.find_in_range(TimeRange::half_open(start, end)),
        )
        .await
    }

    /// Reconcile one shift against its attributed sales
    pub async fn reconcile(&self, shift_id: i64) -> AppResult<ShiftReconciliation> {
        let shift = self.get_shift(shift_id).await?;
        let date = time::local_date_of(shift.start_time, self.tz);
        let same_day = self.shifts_by_date(date).await?;
        self.reconcile_with(&shift, &same_day).await
    }

    /// One reconciliation per shift the cashier started on `date`, oldest first
    ///
    /// A bill without shift id lands in exactly one of these entries.
    pub async fn reconcile_cashier_day(
        &self,
        cashier_name: &str,
        date: NaiveDate,
    ) -> AppResult<Vec<ShiftReconciliation>> {
        validate_required_text(cashier_name, "cashier", MAX_NAME_LEN)?;
        let same_day = self.shifts_by_date(date).await?;

        let mut cashier_shifts: Vec<&Shift> = same_day
            .iter()
            .filter(|s| s.cashier_name == cashier_name.trim())
            .collect();
        cashier_shifts.sort_by_key(|s| s.start_time);

        let results = futures::future::try_join_all(
            cashier_shifts
                .into_iter()
                .map(|shift| self.reconcile_with(shift, &same_day)),
        )
        .await?;
        Ok(results)
    }

    async fn reconcile_with(
        &self,
        shift: &Shift,
        same_day: &[Shift],
    ) -> AppResult<ShiftReconciliation> {
        let date = time::local_date_of(shift.start_time, self.tz);
        let (start, end) = time::date_span(date, date, self.tz)?;

        let mut candidates = self
            .store("bill.find_by_shift", self.bills.find_by_shift(shift.id))
            .await?;
        candidates.extend(
            self.store(
                "bill.find_in_range",
                self.bills.find_in_range(TimeRange::half_open(start, end)),
            )
            .await?,
        );

        Ok(reconcile::reconcile(shift, &candidates, same_day, self.tz))
    }
}

fn shift_already_open(cashier_name: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ShiftAlreadyOpen,
        format!("{cashier_name} already has an open shift"),
    )
    .with_detail("cashier_name", cashier_name)
}
