// ==========================================
// HR 数据分析平台 - 上传任务与诊断记录
// ==========================================
// UploadJob: 上传任务台账（由编排器独占写入）
// UploadError: 行级诊断记录（追加写，回滚后仍保留）
// ==========================================

use crate::domain::types::{RowErrorKind, SheetMapping, UploadStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 上传任务台账记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadJob {
    pub id: String,
    pub filename: String,
    pub uploader: String,
    pub status: UploadStatus,
    pub processed_rows: i64,
    pub failed_rows: i64,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    /// 失败时的错误摘要（JSON 序列化的行级错误列表）
    pub error_summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// 行级诊断记录（持久化形态）
///
/// 行号为 1 起始且包含表头偏移（数据首行 = 2）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadError {
    pub id: String,
    pub upload_id: String,
    pub sheet: String,
    pub row: usize,
    pub column: Option<String>,
    pub message: String,
    /// 清洗后行内容的 JSON 快照，便于排查
    pub sample: String,
    pub created_at: DateTime<Utc>,
}

/// 行级错误（汇总/返回形态）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    pub sheet: String,
    pub row: usize,
    pub column: Option<String>,
    pub message: String,
    pub kind: RowErrorKind,
    /// 清洗后行内容的 JSON 快照
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

/// 报表期间（来自 UploadMetadata sheet）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingPeriod {
    /// 期间键（YYYY-MM，以期间起始日为准）
    pub fn month_key(&self) -> String {
        use chrono::Datelike;
        format!("{:04}-{:02}", self.start.year(), self.start.month())
    }
}

/// 单个 sheet 的处理汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSummary {
    pub sheet: String,
    pub processed_rows: usize,
    pub failed_rows: usize,
    /// 静默跳过的行数（如可选 sheet 缺员工号）
    pub skipped_rows: usize,
    /// Vendor 模式下命中的启发式（模板模式为 None）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<SheetMapping>,
    pub errors: Vec<RowError>,
}

impl SheetSummary {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            processed_rows: 0,
            failed_rows: 0,
            skipped_rows: 0,
            mapping: None,
            errors: Vec::new(),
        }
    }
}

/// 整次上传的处理汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub file: String,
    pub sheets: Vec<SheetSummary>,
    pub processed_rows: usize,
    pub failed_rows: usize,
    pub errors: Vec<RowError>,
    pub period: Option<ReportingPeriod>,
    /// 每个期间的请假工作日分布（供趋势分析消费）
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub leave_days_by_period: BTreeMap<String, u32>,
}

impl IngestSummary {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            sheets: Vec::new(),
            processed_rows: 0,
            failed_rows: 0,
            errors: Vec::new(),
            period: None,
            leave_days_by_period: BTreeMap::new(),
        }
    }

    /// 合入单个 sheet 的汇总并累加总计数
    pub fn push_sheet(&mut self, sheet: SheetSummary) {
        self.processed_rows += sheet.processed_rows;
        self.failed_rows += sheet.failed_rows;
        self.errors.extend(sheet.errors.iter().cloned());
        self.sheets.push(sheet);
    }
}

/// 单次上传的调用方选项
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// 上传者标识（缺省 "api"）
    pub uploader: Option<String>,
    /// 本次上传追加的节假日覆写（ISO 日期字符串）
    pub extra_holidays: Vec<String>,
}
