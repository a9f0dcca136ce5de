//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 service/handler 层完成，
//! store 层只接收 `i64` Unix millis。

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult, ErrorCode};

/// 查询参数可接受的最早时间点 (2000-01-01T00:00:00Z)
pub const MIN_INSTANT_MILLIS: i64 = 946_684_800_000;
/// 查询参数可接受的最晚时间点 (不含, 2100-01-01T00:00:00Z)
pub const MAX_INSTANT_MILLIS: i64 = 4_102_444_800_000;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 解析月份字符串 (YYYY-MM)
pub fn parse_month(month: &str) -> AppResult<(i32, u32)> {
    let first = format!("{}-01", month.trim());
    let date = NaiveDate::parse_from_str(&first, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid month format: {}", month)))?;
    Ok((date.year(), date.month()))
}

/// 解析时间点: 整数毫秒 / RFC 3339 / YYYY-MM-DD (业务时区零点)
///
/// 结果必须落在 `[MIN_INSTANT_MILLIS, MAX_INSTANT_MILLIS)` 内，
/// 因此 `20240306` 这类紧凑日期会被拒绝，而不是当作 1970 年的毫秒数。
pub fn parse_instant(value: &str, tz: Tz) -> AppResult<i64> {
    let value = value.trim();
    let millis = if let Ok(millis) = value.parse::<i64>() {
        millis
    } else if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.timestamp_millis()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(|date| day_start_millis(date, tz))
            .map_err(|_| AppError::validation(format!("Invalid date or time: {}", value)))?
    };

    if !(MIN_INSTANT_MILLIS..MAX_INSTANT_MILLIS).contains(&millis) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{value} is outside the supported range (2000-01-01 to 2099-12-31)"),
        )
        .with_detail("value", value));
    }
    Ok(millis)
}

/// 本地时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn local_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    local_to_millis(date.and_time(NaiveTime::MIN), tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Unix millis → 业务日期
pub fn local_date_of(millis: i64, tz: Tz) -> NaiveDate {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&tz).date_naive())
        .unwrap_or_default()
}

/// Unix millis → YYYY-MM-DD (业务时区)
pub fn date_key(millis: i64, tz: Tz) -> String {
    local_date_of(millis, tz).format("%Y-%m-%d").to_string()
}

/// 日范围 `[00:00, 次日 00:00)`
pub fn day_range(reference: i64, tz: Tz) -> (i64, i64) {
    let date = local_date_of(reference, tz);
    (day_start_millis(date, tz), day_end_millis(date, tz))
}

/// 周范围 (周日 → 周六)
///
/// Starts at 00:00 of the Sunday on or before `start`'s day and ends at
/// 00:00 of the Sunday after the Saturday of `end`'s week (exclusive).
pub fn week_range(start: i64, end: i64, tz: Tz) -> AppResult<(i64, i64)> {
    if end < start {
        return Err(AppError::validation("Week end must not be before week start"));
    }
    let start_date = local_date_of(start, tz);
    let end_date = local_date_of(end, tz);

    let sunday = start_date
        .checked_sub_days(Days::new(u64::from(start_date.weekday().num_days_from_sunday())))
        .ok_or_else(|| AppError::validation(format!("Week start {start_date} is out of range")))?;
    let saturday = end_date
        .checked_add_days(Days::new(u64::from(6 - end_date.weekday().num_days_from_sunday())))
        .ok_or_else(|| AppError::validation(format!("Week end {end_date} is out of range")))?;

    Ok((day_start_millis(sunday, tz), day_end_millis(saturday, tz)))
}

/// 月范围 (首日 00:00:00.000 → 末日 23:59:59.999，两端都包含)
pub fn month_range(year: i32, month: u32, tz: Tz) -> AppResult<(i64, i64)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}-{:02}", year, month)))?;
    let next_first = first
        .checked_add_months(chrono::Months::new(1))
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}-{:02}", year, month)))?;

    Ok((day_start_millis(first, tz), day_start_millis(next_first, tz) - 1))
}

/// 日期区间 `[start_date 00:00, end_date+1 00:00)`
pub fn date_span(start_date: NaiveDate, end_date: NaiveDate, tz: Tz) -> AppResult<(i64, i64)> {
    if end_date < start_date {
        return Err(AppError::validation(format!(
            "End date {} is before start date {}",
            end_date, start_date
        )));
    }
    Ok((day_start_millis(start_date, tz), day_end_millis(end_date, tz)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Manila;
    use chrono_tz::UTC;

    fn manila(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Manila
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-06").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
        );
        assert!(parse_date("06/03/2024").is_err());
    }

    #[test]
    fn test_parse_instant_accepts_three_forms() {
        assert_eq!(parse_instant("1700000000000", Manila).unwrap(), 1_700_000_000_000);
        assert_eq!(
            parse_instant("2024-03-06T10:00:00+08:00", Manila).unwrap(),
            manila(2024, 3, 6, 10, 0)
        );
        assert_eq!(
            parse_instant("2024-03-06", Manila).unwrap(),
            manila(2024, 3, 6, 0, 0)
        );
        assert!(parse_instant("yesterday", Manila).is_err());
    }

    #[test]
    fn test_parse_instant_rejects_implausible_millis() {
        // compact date, not millis
        let err = parse_instant("20240306", Manila).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);

        assert!(parse_instant("8210266833600000", Manila).is_err());
        assert!(parse_instant("-1", Manila).is_err());
        assert!(parse_instant("2150-01-01", Manila).is_err());
        assert_eq!(
            parse_instant(&MIN_INSTANT_MILLIS.to_string(), Manila).unwrap(),
            MIN_INSTANT_MILLIS
        );
        assert!(parse_instant(&MAX_INSTANT_MILLIS.to_string(), Manila).is_err());
    }

    #[test]
    fn test_day_range_is_local_midnight_to_midnight() {
        let (start, end) = day_range(manila(2024, 3, 6, 23, 59), Manila);
        assert_eq!(start, manila(2024, 3, 6, 0, 0));
        assert_eq!(end, manila(2024, 3, 7, 0, 0));
    }

    #[test]
    fn test_week_range_from_wednesday() {
        // 2024-03-06 is a Wednesday
        let wed = manila(2024, 3, 6, 15, 30);
        let (start, end) = week_range(wed, wed, Manila).unwrap();
        assert_eq!(start, manila(2024, 3, 3, 0, 0));
        assert_eq!(end, manila(2024, 3, 10, 0, 0));
    }

    #[test]
    fn test_week_range_sunday_and_saturday_edges() {
        let sunday = manila(2024, 3, 3, 0, 0);
        let saturday = manila(2024, 3, 9, 23, 0);
        assert_eq!(
            week_range(sunday, saturday, Manila).unwrap(),
            (manila(2024, 3, 3, 0, 0), manila(2024, 3, 10, 0, 0))
        );

        // spans two weeks
        let next_tuesday = manila(2024, 3, 12, 9, 0);
        assert_eq!(
            week_range(sunday, next_tuesday, Manila).unwrap().1,
            manila(2024, 3, 17, 0, 0)
        );
    }

    #[test]
    fn test_week_range_rejects_reversed_bounds() {
        let wed = manila(2024, 3, 6, 15, 30);
        assert!(week_range(wed, wed - 1, Manila).is_err());
    }

    #[test]
    fn test_week_range_at_calendar_limits_is_an_error() {
        // NaiveDate::MAX is a Monday: its Saturday does not exist
        let max = day_start_millis(NaiveDate::MAX, UTC);
        assert!(week_range(0, max, UTC).is_err());

        // NaiveDate::MIN is a Thursday: its Sunday does not exist
        let min = day_start_millis(NaiveDate::MIN, UTC);
        assert!(week_range(min, min, UTC).is_err());
    }

    #[test]
    fn test_month_range_inclusive_end() {
        let (start, end) = month_range(2024, 2, Manila).unwrap();
        assert_eq!(start, manila(2024, 2, 1, 0, 0));
        assert_eq!(end, manila(2024, 3, 1, 0, 0) - 1);

        let (_, dec_end) = month_range(2023, 12, Manila).unwrap();
        assert_eq!(dec_end, manila(2024, 1, 1, 0, 0) - 1);

        assert!(month_range(2024, 13, Manila).is_err());
    }

    #[test]
    fn test_date_key_uses_business_timezone() {
        // 2024-03-06 17:00 UTC is already 2024-03-07 in Manila
        let utc = chrono::Utc
            .with_ymd_and_hms(2024, 3, 6, 17, 0, 0)
            .unwrap()
            .timestamp_millis();
        assert_eq!(date_key(utc, Manila), "2024-03-07");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(parse_month("2024-13").is_err());
    }
}
