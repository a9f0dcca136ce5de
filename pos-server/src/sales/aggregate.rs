//! Sales aggregation
//!
//! Pure reductions over bill lists. Callers resolve the time window and
//! fetch candidate bills; everything here is deterministic and clock free.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    Bill, CashierDailySales, DailyBucket, DailyBuckets, SalesTotal, SoldItemSummary,
};

use super::money::{line_total, to_decimal, to_f64};
use crate::db::TimeRange;
use crate::utils::time;

/// Total of bills inside `range`
///
/// Bills outside `range` are ignored even if the caller passed them in.
/// Voided bills only count towards `voided_count`/`voided_amount`.
pub fn sales_total(bills: &[Bill], range: TimeRange) -> SalesTotal {
    let mut total = Decimal::ZERO;
    let mut discount = Decimal::ZERO;
    let mut voided_amount = Decimal::ZERO;
    let mut bill_count = 0;
    let mut voided_count = 0;

    for bill in bills.iter().filter(|b| range.contains(b.created_at)) {
        if bill.voided {
            voided_count += 1;
            voided_amount += to_decimal(bill.total_amount);
        } else {
            bill_count += 1;
            total += to_decimal(bill.total_amount);
            discount += to_decimal(bill.discount);
        }
    }

    SalesTotal {
        start: range.start,
        end: range.end,
        end_inclusive: range.end_inclusive,
        total_amount: to_f64(total),
        bill_count,
        voided_count,
        voided_amount: to_f64(voided_amount),
        total_discount: to_f64(discount),
    }
}

/// Per-calendar-day totals over `range`
///
/// Days without a counted bill are left out; buckets are ascending by date.
pub fn daily_buckets(bills: &[Bill], range: TimeRange, tz: Tz) -> DailyBuckets {
    let mut days: BTreeMap<String, (Decimal, i64)> = BTreeMap::new();
    let mut grand_total = Decimal::ZERO;

    for bill in bills
        .iter()
        .filter(|b| !b.voided && range.contains(b.created_at))
    {
        let amount = to_decimal(bill.total_amount);
        let entry = days
            .entry(time::date_key(bill.created_at, tz))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += amount;
        entry.1 += 1;
        grand_total += amount;
    }

    DailyBuckets {
        start: range.start,
        end: range.end,
        buckets: days
            .into_iter()
            .map(|(date, (total, count))| DailyBucket {
                date,
                total_amount: to_f64(total),
                bill_count: count,
            })
            .collect(),
        grand_total: to_f64(grand_total),
    }
}

/// Per `(day, cashier)` totals, sorted by day then cashier
pub fn cashier_daily(bills: &[Bill], range: TimeRange, tz: Tz) -> Vec<CashierDailySales> {
    let mut groups: BTreeMap<(String, String), (Decimal, i64)> = BTreeMap::new();

    for bill in bills
        .iter()
        .filter(|b| !b.voided && range.contains(b.created_at))
    {
        let key = (time::date_key(bill.created_at, tz), bill.cashier_name.clone());
        let entry = groups.entry(key).or_insert((Decimal::ZERO, 0));
        entry.0 += to_decimal(bill.total_amount);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((date, cashier_name), (total, count))| CashierDailySales {
            date,
            cashier_name,
            total_amount: to_f64(total),
            bill_count: count,
        })
        .collect()
}

/// Quantity sold per `(cashier, item, unit price)`
///
/// The same item sold at two prices yields two rows.
pub fn sold_items(bills: &[Bill], range: TimeRange) -> Vec<SoldItemSummary> {
    let mut groups: BTreeMap<(String, String, Decimal), (i64, Decimal)> = BTreeMap::new();

    for bill in bills
        .iter()
        .filter(|b| !b.voided && range.contains(b.created_at))
    {
        for line in &bill.cart_items {
            let key = (
                bill.cashier_name.clone(),
                line.item.clone(),
                to_decimal(line.price).normalize(),
            );
            let entry = groups.entry(key).or_insert((0, Decimal::ZERO));
            entry.0 += i64::from(line.qty);
            entry.1 += line_total(line.qty, line.price);
        }
    }

    groups
        .into_iter()
        .map(|((cashier_name, item, price), (quantity, total))| SoldItemSummary {
            cashier_name,
            item,
            price: to_f64(price),
            quantity,
            line_total: to_f64(total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Manila;
    use shared::models::CartItem;

    fn at(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Manila
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn bill(id: i64, cashier: &str, total: f64, created_at: i64) -> Bill {
        Bill {
            id,
            invoice_number: format!("INV-{id:03}"),
            cashier_name: cashier.to_string(),
            customer_name: None,
            customer_number: None,
            payment_mode: Some("cash".into()),
            cart_items: vec![],
            sub_total: total,
            vat_sales: 0.0,
            vat_amount: 0.0,
            cash: total,
            change: 0.0,
            total_amount: total,
            discount: 0.0,
            is_senior_or_pwd: false,
            shift_id: None,
            voided: false,
            voided_at: None,
            created_at,
        }
    }

    fn voided(mut b: Bill) -> Bill {
        b.voided = true;
        b
    }

    #[test]
    fn test_total_excludes_voided_bills() {
        let bills = vec![
            bill(1, "Ana", 100.0, at(2024, 3, 6, 9)),
            voided(bill(2, "Ana", 250.0, at(2024, 3, 6, 10))),
            bill(3, "Ben", 50.5, at(2024, 3, 6, 11)),
        ];
        let range = TimeRange::half_open(at(2024, 3, 6, 0), at(2024, 3, 7, 0));
        let total = sales_total(&bills, range);

        assert_eq!(total.total_amount, 150.5);
        assert_eq!(total.bill_count, 2);
        assert_eq!(total.voided_count, 1);
        assert_eq!(total.voided_amount, 250.0);
    }

    #[test]
    fn test_total_respects_window_edges() {
        let bills = vec![
            bill(1, "Ana", 10.0, at(2024, 3, 6, 0)),
            bill(2, "Ana", 20.0, at(2024, 3, 7, 0)),
        ];
        let half_open = TimeRange::half_open(at(2024, 3, 6, 0), at(2024, 3, 7, 0));
        assert_eq!(sales_total(&bills, half_open).total_amount, 10.0);

        let inclusive = TimeRange::inclusive(at(2024, 3, 6, 0), at(2024, 3, 7, 0));
        assert_eq!(sales_total(&bills, inclusive).total_amount, 30.0);
    }

    #[test]
    fn test_total_discount_counts_only_live_bills() {
        let mut senior = bill(1, "Ana", 1000.0, at(2024, 3, 6, 9));
        senior.discount = 200.0;
        let mut voided_senior = voided(bill(2, "Ana", 500.0, at(2024, 3, 6, 9)));
        voided_senior.discount = 100.0;

        let range = TimeRange::half_open(at(2024, 3, 6, 0), at(2024, 3, 7, 0));
        let total = sales_total(&[senior, voided_senior], range);
        assert_eq!(total.total_discount, 200.0);
        // discount stays informational
        assert_eq!(total.total_amount, 1000.0);
    }

    #[test]
    fn test_daily_buckets_group_by_local_day() {
        let bills = vec![
            bill(1, "Ana", 100.0, at(2024, 3, 5, 23)),
            bill(2, "Ana", 40.0, at(2024, 3, 6, 1)),
            bill(3, "Ben", 60.0, at(2024, 3, 6, 22)),
            voided(bill(4, "Ben", 999.0, at(2024, 3, 7, 8))),
        ];
        let range = TimeRange::half_open(at(2024, 3, 5, 0), at(2024, 3, 8, 0));
        let result = daily_buckets(&bills, range, Manila);

        assert_eq!(result.buckets.len(), 2);
        assert_eq!(result.buckets[0].date, "2024-03-05");
        assert_eq!(result.buckets[0].total_amount, 100.0);
        assert_eq!(result.buckets[1].date, "2024-03-06");
        assert_eq!(result.buckets[1].total_amount, 100.0);
        assert_eq!(result.buckets[1].bill_count, 2);
        assert_eq!(result.grand_total, 200.0);
    }

    #[test]
    fn test_daily_sum_matches_month_total() {
        let mut bills = Vec::new();
        let mut id = 0;
        for day in 1..=31u32 {
            for hour in [0u32, 12, 23] {
                id += 1;
                bills.push(bill(id, "Ana", 10.25 * f64::from(hour + 1), at(2024, 3, day, hour)));
            }
        }
        // edges of neighbouring months must not leak in
        bills.push(bill(1000, "Ana", 5000.0, at(2024, 2, 29, 23)));
        bills.push(bill(1001, "Ana", 5000.0, at(2024, 4, 1, 0)));

        let (start, end) = time::month_range(2024, 3, Manila).unwrap();
        let month = sales_total(&bills, TimeRange::inclusive(start, end));

        let mut daily_sum = Decimal::ZERO;
        for day in 1..=31u32 {
            let (day_start, day_end) = time::day_range(at(2024, 3, day, 12), Manila);
            let total = sales_total(&bills, TimeRange::half_open(day_start, day_end));
            daily_sum += to_decimal(total.total_amount);
        }

        assert_eq!(to_f64(daily_sum), month.total_amount);
        assert_eq!(month.bill_count, 93);
    }

    #[test]
    fn test_cashier_daily_sorted() {
        let bills = vec![
            bill(1, "Ben", 10.0, at(2024, 3, 6, 9)),
            bill(2, "Ana", 20.0, at(2024, 3, 6, 10)),
            bill(3, "Ana", 5.0, at(2024, 3, 6, 11)),
            bill(4, "Ana", 7.0, at(2024, 3, 5, 11)),
        ];
        let range = TimeRange::half_open(at(2024, 3, 5, 0), at(2024, 3, 7, 0));
        let rows = cashier_daily(&bills, range, Manila);

        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.date.as_str(), r.cashier_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("2024-03-05", "Ana"), ("2024-03-06", "Ana"), ("2024-03-06", "Ben")]
        );
        assert_eq!(rows[1].total_amount, 25.0);
        assert_eq!(rows[1].bill_count, 2);
    }

    #[test]
    fn test_sold_items_by_cashier_item_price() {
        let mut a = bill(1, "Ana", 0.0, at(2024, 3, 6, 9));
        a.cart_items = vec![
            CartItem { item: "Rice".into(), qty: 2, price: 50.0 },
            CartItem { item: "Soda".into(), qty: 1, price: 25.0 },
        ];
        let mut b = bill(2, "Ana", 0.0, at(2024, 3, 6, 10));
        b.cart_items = vec![
            CartItem { item: "Rice".into(), qty: 3, price: 50.0 },
            CartItem { item: "Rice".into(), qty: 1, price: 45.0 },
        ];
        let mut c = voided(bill(3, "Ana", 0.0, at(2024, 3, 6, 11)));
        c.cart_items = vec![CartItem { item: "Rice".into(), qty: 10, price: 50.0 }];

        let range = TimeRange::half_open(at(2024, 3, 6, 0), at(2024, 3, 7, 0));
        let rows = sold_items(&[a, b, c], range);

        assert_eq!(rows.len(), 3);
        let rice_50 = rows
            .iter()
            .find(|r| r.item == "Rice" && r.price == 50.0)
            .unwrap();
        assert_eq!(rice_50.quantity, 5);
        assert_eq!(rice_50.line_total, 250.0);
        let rice_45 = rows
            .iter()
            .find(|r| r.item == "Rice" && r.price == 45.0)
            .unwrap();
        assert_eq!(rice_45.quantity, 1);
    }
}
