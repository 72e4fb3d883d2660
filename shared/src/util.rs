//! 日期/时间工具
//!
//! 时间戳统一为 epoch 毫秒 (i64)，chrono 只在边界使用。

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

/// 当前时间 (epoch 毫秒)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 订单号日期前缀 "YYMMDD"
pub fn date_stamp(date: DateTime<Local>) -> String {
    format!(
        "{:02}{:02}{:02}",
        date.year() % 100,
        date.month(),
        date.day()
    )
}

/// 今天的订单号日期前缀
pub fn today_stamp() -> String {
    date_stamp(Local::now())
}

/// 解析 "YYYY-MM-DD" 为当天起始的 epoch 毫秒
pub fn day_start_millis(date: &str) -> Option<i64> {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    // DST 间隙里取最早的合法本地时间
    let dt = Local.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).earliest()?;
    Some(dt.timestamp_millis())
}

/// 解析 "YYYY-MM-DD" 为当天结束的 epoch 毫秒
pub fn day_end_millis(date: &str) -> Option<i64> {
    let d = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let dt = Local
        .from_local_datetime(&d.and_hms_milli_opt(23, 59, 59, 999)?)
        .latest()?;
    Some(dt.timestamp_millis())
}

/// 今天的 [起始, 结束] epoch 毫秒区间
pub fn today_range_millis() -> (i64, i64) {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let start = day_start_millis(&today).unwrap_or_else(now_millis);
    let end = day_end_millis(&today).unwrap_or_else(now_millis);
    (start, end)
}

/// epoch 毫秒所在月份 (1-12)，用于月度报表分组
pub fn month_of_millis(millis: i64) -> Option<u32> {
    Some(Local.timestamp_millis_opt(millis).single()?.month())
}

/// 某年的 [起始, 结束] epoch 毫秒区间
pub fn year_range_millis(year: i32) -> Option<(i64, i64)> {
    let start = Local
        .from_local_datetime(&NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?)
        .single()?
        .timestamp_millis();
    let end = Local
        .from_local_datetime(
            &NaiveDate::from_ymd_opt(year, 12, 31)?.and_hms_milli_opt(23, 59, 59, 999)?,
        )
        .single()?
        .timestamp_millis();
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_stamp_format() {
        let date = Local.with_ymd_and_hms(2025, 3, 7, 10, 30, 0).unwrap();
        assert_eq!(date_stamp(date), "250307");
    }

    #[test]
    fn test_day_range_parsing() {
        let start = day_start_millis("2025-06-15").unwrap();
        let end = day_end_millis("2025-06-15").unwrap();
        assert!(start < end);
        // A full day minus one millisecond
        assert_eq!(end - start, 24 * 3600 * 1000 - 1);
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(day_start_millis("not-a-date").is_none());
        assert!(day_start_millis("2025-13-40").is_none());
    }

    #[test]
    fn test_year_range_contains_months() {
        let (start, end) = year_range_millis(2025).unwrap();
        assert_eq!(month_of_millis(start), Some(1));
        assert_eq!(month_of_millis(end), Some(12));
    }
}
