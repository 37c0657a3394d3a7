// ==========================================
// HR 数据分析平台 - 实体 Upsert 解析器
// ==========================================
// 共享契约: resolve(tx, ctx, row) → RowOutcome | RowError
// 两个前端（模板严格行源 / Vendor 表头嗅探行源）喂同一组解析器，
// 业务规则只存在一份。
// ==========================================

pub mod department;
pub mod employee;
pub mod engagement;
pub mod leave;
pub mod records;
pub mod statutory;
pub mod vacancy;

use crate::domain::types::RowErrorKind;
use crate::domain::upload::{ReportingPeriod, RowError};
use crate::importer::dates;
use crate::importer::shape::normalize_header;
use crate::importer::workbook::{Cell, RowRecord};
use chrono::NaiveDate;
use rusqlite::Transaction;
use std::collections::{BTreeMap, HashMap, HashSet};

// 重导出解析器实现
pub use department::DepartmentResolver;
pub use employee::EmployeeResolver;
pub use engagement::EngagementResolver;
pub use leave::LeaveResolver;
pub use records::{ExitResolver, OnboardingResolver, SickbayResolver, TrainingResolver};
pub use statutory::StatutoryResolver;
pub use vacancy::VacancyResolver;

/// 解析模式
///
/// - Strict: 模板模式（固定列名，必填字段缺失即行失败）
/// - Lenient: Vendor 模式（表头别名 + 状态字段缺省填充）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    Strict,
    Lenient,
}

/// 单行解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// 已写入（插入/更新/合并）
    Applied,
    /// 请假区间重叠，按重复跳过（计入 processed）
    SkippedDuplicateOverlap,
    /// 可选 sheet 缺员工号，静默跳过（不计 processed/failed）
    SkippedMissingLink,
}

/// 单次上传的解析上下文
///
/// 两张自然键映射表的生命周期限于单个工作簿遍历：
/// 先处理的 sheet 写入，后处理的 sheet 读取，免去重复查库
pub struct UploadContext {
    pub upload_id: String,
    pub source_file: String,
    pub holidays: HashSet<NaiveDate>,
    pub period: Option<ReportingPeriod>,
    pub mode: ResolveMode,
    /// department_code → departments.id
    pub department_ids: HashMap<String, String>,
    /// employee_number → employees.id
    pub employee_ids: HashMap<String, String>,
    /// 本次上传请假工作日的按月分布（汇总输出）
    pub leave_days_by_period: BTreeMap<String, u32>,
}

impl UploadContext {
    pub fn new(upload_id: &str, source_file: &str, mode: ResolveMode) -> Self {
        Self {
            upload_id: upload_id.to_string(),
            source_file: source_file.to_string(),
            holidays: HashSet::new(),
            period: None,
            mode,
            department_ids: HashMap::new(),
            employee_ids: HashMap::new(),
            leave_days_by_period: BTreeMap::new(),
        }
    }
}

/// 实体解析器统一接口
pub trait EntityResolver {
    /// 解析并落一行（清洗后的行）
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError>;
}

// ==========================================
// 行字段读取视图
// ==========================================
// - 精确别名: 按模板列名（含注释形态与裸名）逐个尝试
// - 模糊别名: 表头归一后比对（Vendor 模式）
// ==========================================
pub struct RowView<'a> {
    row: &'a RowRecord,
    sheet: &'a str,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a RowRecord, sheet: &'a str) -> Self {
        Self { row, sheet }
    }

    pub fn row_number(&self) -> usize {
        self.row.row_number
    }

    fn cell_exact(&self, keys: &[&str]) -> Option<&Cell> {
        for key in keys {
            if let Some(cell) = self.row.cells.get(*key) {
                if !cell.is_empty() {
                    return Some(cell);
                }
            }
        }
        None
    }

    fn cell_fuzzy(&self, normalized_keys: &[&str]) -> Option<&Cell> {
        for (key, cell) in &self.row.cells {
            if cell.is_empty() {
                continue;
            }
            let normalized = normalize_header(key);
            if normalized_keys.iter().any(|k| normalized == *k) {
                return Some(cell);
            }
        }
        None
    }

    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.cell_exact(keys).and_then(|c| c.as_text())
    }

    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        self.cell_exact(keys).and_then(|c| c.as_f64())
    }

    pub fn date(&self, keys: &[&str]) -> Option<NaiveDate> {
        self.cell_exact(keys).and_then(dates::normalize)
    }

    pub fn text_fuzzy(&self, normalized_keys: &[&str]) -> Option<String> {
        self.cell_fuzzy(normalized_keys).and_then(|c| c.as_text())
    }

    pub fn number_fuzzy(&self, normalized_keys: &[&str]) -> Option<f64> {
        self.cell_fuzzy(normalized_keys).and_then(|c| c.as_f64())
    }

    pub fn date_fuzzy(&self, normalized_keys: &[&str]) -> Option<NaiveDate> {
        self.cell_fuzzy(normalized_keys).and_then(dates::normalize)
    }

    /// 构造行级错误（样本快照由编排器补充）
    pub fn error(&self, column: Option<&str>, kind: RowErrorKind, message: &str) -> RowError {
        RowError {
            sheet: self.sheet.to_string(),
            row: self.row.row_number,
            column: column.map(|c| c.to_string()),
            message: message.to_string(),
            kind,
            sample: None,
        }
    }
}

/// 数据库错误 → 行级错误（行不中止 sheet，聚合后整体回滚）
pub fn db_row_error(sheet: &str, row: usize, err: impl std::fmt::Display) -> RowError {
    RowError {
        sheet: sheet.to_string(),
        row,
        column: None,
        message: format!("row_failed: {}", err),
        kind: RowErrorKind::RowFailed,
        sample: None,
    }
}
