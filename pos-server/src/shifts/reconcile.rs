//! Cash drawer reconciliation
//!
//! ```text
//! expected_cash = starting_cash + attributed_sales
//! difference    = expected_cash - ending_cash      (positive = shortage)
//! ```
//!
//! A bill belongs to a shift when it carries the shift's id, or when it
//! carries no shift id at all and was rung by the same cashier (exact name
//! match) on the business day the shift started. With several shifts that
//! day, such a bill goes to the latest shift started at or before the sale
//! (the earliest shift if the sale precedes them all), so it is counted once.

use std::collections::HashSet;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{Bill, Shift, ShiftReconciliation};

use crate::sales::money::{to_decimal, to_f64};
use crate::utils::time;

/// Whether `bill` counts towards `shift` under the name+day rule
fn is_legacy_match(bill: &Bill, shift: &Shift, tz: Tz) -> bool {
    bill.shift_id.is_none()
        && bill.cashier_name == shift.cashier_name
        && time::local_date_of(bill.created_at, tz) == time::local_date_of(shift.start_time, tz)
}

/// Owner of a bill without shift id among one cashier's shifts of a day
fn legacy_owner(created_at: i64, day_shifts: &[&Shift]) -> Option<i64> {
    day_shifts
        .iter()
        .filter(|s| s.start_time <= created_at)
        .max_by_key(|s| (s.start_time, s.id))
        .or_else(|| day_shifts.iter().min_by_key(|s| (s.start_time, s.id)))
        .map(|s| s.id)
}

/// Reconcile one shift against candidate bills
///
/// `candidates` may contain unrelated or duplicate bills; only those
/// attributed to `shift` are counted, each once. `same_day` lists shifts
/// started on the shift's business day; other cashiers' shifts are ignored
/// and `shift` itself need not be included.
pub fn reconcile(
    shift: &Shift,
    candidates: &[Bill],
    same_day: &[Shift],
    tz: Tz,
) -> ShiftReconciliation {
    let day = time::local_date_of(shift.start_time, tz);
    let mut day_shifts: Vec<&Shift> = same_day
        .iter()
        .filter(|s| {
            s.id != shift.id
                && s.cashier_name == shift.cashier_name
                && time::local_date_of(s.start_time, tz) == day
        })
        .collect();
    day_shifts.push(shift);
    let same_day_shifts = day_shifts.len();

    let mut seen = HashSet::new();
    let mut attributed = Decimal::ZERO;
    let mut bill_count = 0;
    let mut used_legacy = false;

    for bill in candidates {
        if bill.voided || !seen.insert(bill.id) {
            continue;
        }
        if bill.shift_id == Some(shift.id) {
            attributed += to_decimal(bill.total_amount);
            bill_count += 1;
        } else if is_legacy_match(bill, shift, tz)
            && legacy_owner(bill.created_at, &day_shifts) == Some(shift.id)
        {
            attributed += to_decimal(bill.total_amount);
            bill_count += 1;
            used_legacy = true;
        }
    }

    let expected = to_decimal(shift.starting_cash) + attributed;
    let difference = if shift.is_open() {
        None
    } else {
        shift
            .ending_cash
            .map(|ending| to_f64(expected - to_decimal(ending)))
    };

    let ambiguous_attribution = used_legacy && same_day_shifts > 1;
    if ambiguous_attribution {
        tracing::warn!(
            shift_id = shift.id,
            cashier = %shift.cashier_name,
            same_day_shifts,
            "Bills without a shift id were attributed by cashier name and sale time; \
             several shifts share that day"
        );
    }

    ShiftReconciliation {
        shift_id: shift.id,
        cashier_name: shift.cashier_name.clone(),
        date: time::date_key(shift.start_time, tz),
        starting_cash: shift.starting_cash,
        ending_cash: shift.ending_cash,
        attributed_sales: to_f64(attributed),
        bill_count,
        expected_cash: to_f64(expected),
        difference,
        ambiguous_attribution,
        closed: !shift.is_open(),
    }
}
