// ==========================================
// HR 数据分析平台 - 领域枚举类型
// ==========================================

use serde::{Deserialize, Serialize};

/// 上传任务状态
///
/// 生命周期: PROCESSING → COMPLETED | FAILED（恰好一次终态迁移）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Processing,
    Completed,
    Failed,
}

impl UploadStatus {
    /// 数据库存储格式（全大写，与历史实现对齐）
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Processing => "PROCESSING",
            UploadStatus::Completed => "COMPLETED",
            UploadStatus::Failed => "FAILED",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "PROCESSING" => Some(UploadStatus::Processing),
            "COMPLETED" => Some(UploadStatus::Completed),
            "FAILED" => Some(UploadStatus::Failed),
            _ => None,
        }
    }
}

/// 工作簿形态
///
/// - Template: 严格模板（固定 sheet + 固定表头）
/// - Vendor: 外部系统导出（表头嗅探）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkbookShape {
    Template,
    Vendor,
}

/// Vendor 模式下 sheet 的启发式归类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetMapping {
    /// 含员工号类表头 → 员工花名册
    EmployeeRoster,
    /// 含假期类型/起始日期类表头 → 请假表
    LeaveTable,
}

impl SheetMapping {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetMapping::EmployeeRoster => "employee_roster",
            SheetMapping::LeaveTable => "leave_table",
        }
    }
}

/// 行级错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    MissingEmployeeNumber,
    MissingDepartmentCode,
    InvalidDates,
    RowFailed,
}

impl RowErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowErrorKind::MissingEmployeeNumber => "missing_employee_number",
            RowErrorKind::MissingDepartmentCode => "missing_department_code",
            RowErrorKind::InvalidDates => "invalid_dates",
            RowErrorKind::RowFailed => "row_failed",
        }
    }
}
