use chrono::{Datelike, NaiveDate};

/// 学年从四月开始：一到三月属于上一学年
pub fn academic_year_for(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() < 4 {
        format!("{}-{}", year - 1, year)
    } else {
        format!("{}-{}", year, year + 1)
    }
}

/// 当前学年
pub fn current_academic_year() -> String {
    academic_year_for(chrono::Local::now().date_naive())
}

/// 当月第一天和最后一天（YYYY-MM-DD）
pub fn month_bounds(date: NaiveDate) -> (String, String) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(first);
    (
        first.format("%Y-%m-%d").to_string(),
        last.format("%Y-%m-%d").to_string(),
    )
}

/// 校验 YYYY-MM-DD
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// RFC3339 时间转为 unix 秒
pub fn parse_rfc3339_timestamp(value: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|dt| dt.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_academic_year_boundary() {
        assert_eq!(academic_year_for(d(2025, 3, 31)), "2024-2025");
        assert_eq!(academic_year_for(d(2025, 4, 1)), "2025-2026");
        assert_eq!(academic_year_for(d(2025, 1, 15)), "2024-2025");
        assert_eq!(academic_year_for(d(2025, 12, 31)), "2025-2026");
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(d(2024, 2, 17)),
            ("2024-02-01".to_string(), "2024-02-29".to_string())
        );
        assert_eq!(
            month_bounds(d(2025, 12, 5)),
            ("2025-12-01".to_string(), "2025-12-31".to_string())
        );
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2025-06-01").is_some());
        assert!(parse_date("01/06/2025").is_none());
        assert!(parse_date("2025-13-01").is_none());
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_rfc3339_timestamp("2025-06-01T10:00:00+05:30"),
            Some(1_748_752_200)
        );
        assert_eq!(parse_rfc3339_timestamp("2025-06-01"), None);
    }
}
