// ==========================================
// HR 数据分析平台 - 日期与工作日历工具
// ==========================================
// 职责:
// - 异构日期表示归一（原生日期 / Excel 序列号 / 多格式字符串）
// - 工作日计数（剔除周末与节假日，UTC 日历）
// - 按月分桶（请假趋势口径）
// ==========================================

use crate::importer::workbook::Cell;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::{BTreeMap, HashSet};

/// Excel 序列日期纪元（1899-12-30，日计数）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// 字符串回退格式表（按序尝试，先命中先赢）
///
/// 顺序有业务含义: "09/05/2025" 必须解析为 9 月 5 日而非 5 月 9 日
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// 把任意单元格值归一为日期
///
/// 空值/无法解析返回 None，是否致命由调用方决定
pub fn normalize(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty | Cell::Bool(_) => None,
        Cell::Date(dt) => Some(dt.date()),
        Cell::Number(serial) => serial_to_date(*serial),
        Cell::Text(raw) => parse_date_string(raw),
    }
}

/// Excel 序列号 → 日期（纪元 1899-12-30，忽略时间小数部分）
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(EXCEL_EPOCH.0, EXCEL_EPOCH.1, EXCEL_EPOCH.2)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// 字符串日期解析: ISO-8601 优先，再按回退格式表逐个尝试
fn parse_date_string(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // ISO-8601 带时区（如 2025-09-01T00:00:00Z）
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    // ISO-8601 无时区
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}

/// 工作日计数（含首尾，剔除周六/周日与节假日，天粒度比较）
///
/// end < start 时返回 0
pub fn working_days_between(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HashSet<NaiveDate>,
) -> u32 {
    if end < start {
        return 0;
    }

    let mut count = 0;
    let mut day = start;
    while day <= end {
        let weekday = day.weekday();
        if weekday != Weekday::Sat && weekday != Weekday::Sun && !holidays.contains(&day) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// 期间键（YYYY-MM）
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// 工作日按自然月分桶（剔除规则与 working_days_between 一致）
///
/// 供趋势分析消费: 跨月请假按月拆分计数
pub fn split_across_periods(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HashSet<NaiveDate>,
) -> BTreeMap<String, u32> {
    let mut segments = BTreeMap::new();
    if end < start {
        return segments;
    }

    let mut day = start;
    while day <= end {
        let weekday = day.weekday();
        if weekday != Weekday::Sat && weekday != Weekday::Sun && !holidays.contains(&day) {
            *segments.entry(month_key(day)).or_insert(0) += 1;
        }
        day += Duration::days(1);
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_working_days_full_week() {
        // 2025-09-01 周一 ~ 2025-09-07 周日 → 5 个工作日
        let days = working_days_between(date(2025, 9, 1), date(2025, 9, 7), &HashSet::new());
        assert_eq!(days, 5);
    }

    #[test]
    fn test_working_days_with_holiday() {
        let holidays: HashSet<NaiveDate> = [date(2025, 9, 3)].into_iter().collect();
        let days = working_days_between(date(2025, 9, 1), date(2025, 9, 7), &holidays);
        assert_eq!(days, 4);
    }

    #[test]
    fn test_working_days_end_before_start() {
        let days = working_days_between(date(2025, 9, 7), date(2025, 9, 1), &HashSet::new());
        assert_eq!(days, 0);
    }

    #[test]
    fn test_weekend_holiday_not_double_counted() {
        // 节假日落在周六不额外扣减
        let holidays: HashSet<NaiveDate> = [date(2025, 9, 6)].into_iter().collect();
        let days = working_days_between(date(2025, 9, 1), date(2025, 9, 7), &holidays);
        assert_eq!(days, 5);
    }

    #[test]
    fn test_normalize_format_precedence() {
        // MM/dd/yyyy 先于 dd/MM/yyyy: 09/05/2025 是 9 月 5 日
        let parsed = normalize(&Cell::Text("09/05/2025".to_string()));
        assert_eq!(parsed, Some(date(2025, 9, 5)));
    }

    #[test]
    fn test_normalize_iso_variants() {
        assert_eq!(
            normalize(&Cell::Text("2025-09-05".to_string())),
            Some(date(2025, 9, 5))
        );
        assert_eq!(
            normalize(&Cell::Text("2025-09-01T00:00:00Z".to_string())),
            Some(date(2025, 9, 1))
        );
        assert_eq!(
            normalize(&Cell::Text("2025/09/05".to_string())),
            Some(date(2025, 9, 5))
        );
    }

    #[test]
    fn test_normalize_excel_serial() {
        // 45000 = 2023-03-15
        assert_eq!(normalize(&Cell::Number(45000.0)), Some(date(2023, 3, 15)));
        // 时间小数部分被忽略
        assert_eq!(normalize(&Cell::Number(45000.75)), Some(date(2023, 3, 15)));
    }

    #[test]
    fn test_normalize_native_date() {
        let dt = date(2025, 9, 1).and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(normalize(&Cell::Date(dt)), Some(date(2025, 9, 1)));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize(&Cell::Text("bad-date".to_string())), None);
        assert_eq!(normalize(&Cell::Text("   ".to_string())), None);
        assert_eq!(normalize(&Cell::Empty), None);
    }

    #[test]
    fn test_split_across_periods_cross_month() {
        // 2025-09-29 周一 ~ 2025-10-03 周五
        let segments = split_across_periods(date(2025, 9, 29), date(2025, 10, 3), &HashSet::new());
        assert_eq!(segments.get("2025-09"), Some(&2));
        assert_eq!(segments.get("2025-10"), Some(&3));
    }
}
