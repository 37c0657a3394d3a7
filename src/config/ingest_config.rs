// ==========================================
// HR 数据分析平台 - 导入配置
// ==========================================
// 职责: 节假日日历加载 + 数据库路径解析
// 环境变量:
// - HR_HOLIDAYS_FILE: 节假日 JSON 文件路径（ISO 日期字符串数组）
// - HR_DB_PATH: SQLite 数据库文件路径
// ==========================================

use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// 导入配置
///
/// 节假日日历为进程级配置，单次上传可通过
/// `UploadOptions::extra_holidays` 追加覆写。
#[derive(Debug, Clone, Default)]
pub struct IngestConfig {
    /// 节假日集合（天粒度）
    pub holidays: HashSet<NaiveDate>,
}

impl IngestConfig {
    /// 从环境变量加载配置
    ///
    /// HR_HOLIDAYS_FILE 未设置或文件不可读时返回空日历（不报错）
    pub fn from_env() -> Self {
        match std::env::var("HR_HOLIDAYS_FILE") {
            Ok(path) => Self::from_holidays_file(Path::new(&path)),
            Err(_) => Self::default(),
        }
    }

    /// 从 JSON 文件加载节假日（格式: ["2025-01-01", "2025-05-01", ...]）
    pub fn from_holidays_file(path: &Path) -> Self {
        let mut config = Self::default();

        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "节假日文件读取失败，使用空日历");
                return config;
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => {
                config.holidays = parse_holiday_strings(&entries);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "节假日文件解析失败，使用空日历");
            }
        }

        config
    }

    /// 合并单次上传的节假日覆写，返回本次上传生效的日历
    pub fn merged_holidays(&self, extra: &[String]) -> HashSet<NaiveDate> {
        let mut merged = self.holidays.clone();
        merged.extend(parse_holiday_strings(extra));
        merged
    }
}

/// 解析 ISO 日期字符串列表（忽略无法解析的条目）
fn parse_holiday_strings(entries: &[String]) -> HashSet<NaiveDate> {
    entries
        .iter()
        .filter_map(|s| {
            // 允许带时间部分的 ISO 串，取前 10 字节的日期部分；
            // 第 10 字节不在字符边界上时整串参与解析（随后按不可解析忽略）
            let day = s.trim();
            let day = day.get(..10).unwrap_or(day);
            match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    warn!(value = %s, "无法解析的节假日条目，已忽略");
                    None
                }
            }
        })
        .collect()
}

/// 获取默认数据库路径
///
/// 优先使用 HR_DB_PATH；否则落到用户数据目录下的 hr-ingest/hr.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("HR_DB_PATH") {
        return path;
    }

    let base: PathBuf = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    let dir = base.join("hr-ingest");
    if let Err(e) = std::fs::create_dir_all(&dir) {
        warn!(dir = %dir.display(), error = %e, "数据目录创建失败，使用当前目录");
        return "hr.db".to_string();
    }
    dir.join("hr.db").display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_holidays_file_roundtrip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"["2025-09-03", "2025-10-01T00:00:00Z", "bad"]"#).unwrap();

        let config = IngestConfig::from_holidays_file(file.path());
        assert_eq!(config.holidays.len(), 2);
        assert!(config
            .holidays
            .contains(&NaiveDate::from_ymd_opt(2025, 9, 3).unwrap()));
        assert!(config
            .holidays
            .contains(&NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()));
    }

    #[test]
    fn test_missing_holidays_file_is_empty_calendar() {
        let config = IngestConfig::from_holidays_file(Path::new("no_such_file.json"));
        assert!(config.holidays.is_empty());
    }

    #[test]
    fn test_merged_holidays_overlay() {
        let mut config = IngestConfig::default();
        config
            .holidays
            .insert(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let merged = config.merged_holidays(&["2025-12-25".to_string()]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merged_holidays_ignores_multibyte_garbage() {
        // 第 10 字节落在多字节字符内部也只是按不可解析忽略
        let config = IngestConfig::default();
        let merged = config.merged_holidays(&[
            "2025-09-0三".to_string(),
            "二〇二五年九月三日".to_string(),
            "2025-09-04T00:00:00Z".to_string(),
        ]);
        assert_eq!(merged.len(), 1);
        assert!(merged.contains(&NaiveDate::from_ymd_opt(2025, 9, 4).unwrap()));
    }
}
