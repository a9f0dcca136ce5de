//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::models::{
    CashierDailySales, DailyBuckets, SalesTotal, ShiftReconciliation, SoldItemSummary,
};

use crate::core::ServerState;
use crate::utils::time;
use crate::utils::{AppError, AppResult};

/// Business date from `date`, defaulting to today
fn date_or_today(date: Option<&str>, tz: Tz) -> AppResult<NaiveDate> {
    match date {
        Some(d) => time::parse_date(d),
        None => Ok(time::local_date_of(shared::util::now_millis(), tz)),
    }
}

fn required_param<'a>(value: Option<&'a str>, name: &str) -> AppResult<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::required(name, format!("{name} is required")))
}

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    /// YYYY-MM-DD
    pub date: Option<String>,
    /// Any instant inside the day
    pub at: Option<String>,
}

/// GET /api/reports/daily - 当日销售汇总
pub async fn daily(
    State(state): State<ServerState>,
    Query(query): Query<DailyQuery>,
) -> AppResult<Json<SalesTotal>> {
    let tz = state.sales.timezone();
    let reference = match (query.at.as_deref(), query.date.as_deref()) {
        (Some(at), _) => time::parse_instant(at, tz)?,
        (None, Some(date)) => time::day_start_millis(time::parse_date(date)?, tz),
        (None, None) => shared::util::now_millis(),
    };
    Ok(Json(state.sales.daily_total(reference).await?))
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// GET /api/reports/weekly - 周销售汇总 (周日至周六)
pub async fn weekly(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<SalesTotal>> {
    let tz = state.sales.timezone();
    let start = time::parse_instant(required_param(query.start.as_deref(), "start")?, tz)?;
    let end = time::parse_instant(required_param(query.end.as_deref(), "end")?, tz)?;
    Ok(Json(state.sales.weekly_total(start, end).await?))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    /// YYYY-MM
    pub month: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// GET /api/reports/monthly - 月销售汇总
///
/// `start`/`end` 为闭区间；只给日期时 `end` 覆盖到当天结束。
/// 都不传时取当前月。
pub async fn monthly(
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> AppResult<Json<SalesTotal>> {
    let tz = state.sales.timezone();
    let total = match (query.start.as_deref(), query.end.as_deref(), query.month.as_deref()) {
        (Some(start), Some(end), _) => {
            let start = time::parse_instant(start, tz)?;
            let end = match time::parse_date(end) {
                Ok(date) => time::day_end_millis(date, tz) - 1,
                Err(_) => time::parse_instant(end, tz)?,
            };
            state.sales.monthly_total(start, end).await?
        }
        (None, None, Some(month)) => {
            let (year, month) = time::parse_month(month)?;
            state.sales.month_total(year, month).await?
        }
        (None, None, None) => {
            let today = time::local_date_of(shared::util::now_millis(), tz);
            state.sales.month_total(today.year(), today.month()).await?
        }
        _ => {
            return Err(AppError::validation(
                "Provide either month or both start and end",
            ));
        }
    };
    Ok(Json(total))
}

#[derive(Debug, Deserialize)]
pub struct DateSpanQuery {
    /// YYYY-MM-DD, inclusive
    pub start: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub end: Option<String>,
}

impl DateSpanQuery {
    /// Defaults to today when both ends are absent
    fn dates(&self, tz: Tz) -> AppResult<(NaiveDate, NaiveDate)> {
        let start = date_or_today(self.start.as_deref(), tz)?;
        let end = match self.end.as_deref() {
            Some(end) => time::parse_date(end)?,
            None => start,
        };
        Ok((start, end))
    }
}

/// GET /api/reports/daily-buckets - 按天分组
pub async fn daily_buckets(
    State(state): State<ServerState>,
    Query(query): Query<DateSpanQuery>,
) -> AppResult<Json<DailyBuckets>> {
    let (start, end) = query.dates(state.sales.timezone())?;
    Ok(Json(state.sales.daily_buckets(start, end).await?))
}

/// GET /api/reports/cashier-daily - 按收银员按天汇总
pub async fn cashier_daily(
    State(state): State<ServerState>,
    Query(query): Query<DateSpanQuery>,
) -> AppResult<Json<Vec<CashierDailySales>>> {
    let (start, end) = query.dates(state.sales.timezone())?;
    Ok(Json(state.sales.cashier_daily_sales(start, end).await?))
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// GET /api/reports/sold-items - 当日售出商品
pub async fn sold_items(
    State(state): State<ServerState>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<SoldItemSummary>>> {
    let date = date_or_today(query.date.as_deref(), state.sales.timezone())?;
    Ok(Json(state.sales.sold_items(date).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReconciliationQuery {
    pub cashier: Option<String>,
    pub date: Option<String>,
}

/// GET /api/reports/reconciliation - 收银员某天所有班次的对账
pub async fn reconciliation(
    State(state): State<ServerState>,
    Query(query): Query<ReconciliationQuery>,
) -> AppResult<Json<Vec<ShiftReconciliation>>> {
    let cashier = required_param(query.cashier.as_deref(), "cashier")?;
    let date = date_or_today(query.date.as_deref(), state.sales.timezone())?;
    Ok(Json(state.shifts.reconcile_cashier_day(cashier, date).await?))
}
