// ==========================================
// HR 数据分析平台 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层:
// - 结构性失败（任何行处理前即中止）
// - 行级失败（收集，不中止 sheet）→ 汇总为 ValidationFailed
// ==========================================

use crate::domain::upload::RowError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum IngestError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构性失败（整体中止，无任何业务写入）=====
    #[error("missing_sheet: {}", sheets.join(", "))]
    MissingSheet { sheets: Vec<String> },

    #[error("invalid_columns (sheet {sheet}): missing [{}], unexpected [{}]", missing.join(", "), unexpected.join(", "))]
    InvalidColumns {
        sheet: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("unrecognized_workbook_shape: 无法识别任何 sheet 的表头启发式")]
    UnrecognizedWorkbookShape,

    // ===== 聚合失败（行级错误收集后整体回滚）=====
    #[error("validation_failed: {} 行失败", errors.len())]
    ValidationFailed { errors: Vec<RowError> },

    // ===== 数据库错误 =====
    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for IngestError {
    fn from(err: rusqlite::Error) -> Self {
        IngestError::DatabaseQueryError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        IngestError::ExcelParseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for IngestError {
    fn from(err: serde_json::Error) -> Self {
        IngestError::InternalError(err.to_string())
    }
}

impl IngestError {
    /// 是否为结构性失败（4xx 口径，处理前中止）
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            IngestError::MissingSheet { .. }
                | IngestError::InvalidColumns { .. }
                | IngestError::UnrecognizedWorkbookShape
        )
    }

    /// 对外错误码（台账 error_summary 与 API 载荷使用）
    pub fn code(&self) -> &'static str {
        match self {
            IngestError::MissingSheet { .. } => "missing_sheet",
            IngestError::InvalidColumns { .. } => "invalid_columns",
            IngestError::UnrecognizedWorkbookShape => "unrecognized_workbook_shape",
            IngestError::ValidationFailed { .. } => "validation_failed",
            IngestError::FileNotFound(_) => "file_not_found",
            IngestError::UnsupportedFormat(_) => "unsupported_format",
            IngestError::FileReadError(_)
            | IngestError::ExcelParseError(_)
            | IngestError::CsvParseError(_) => "file_parse_error",
            IngestError::DatabaseTransactionError(_) | IngestError::DatabaseQueryError(_) => {
                "database_error"
            }
            IngestError::InternalError(_) | IngestError::Other(_) => "internal_error",
        }
    }
}

/// Result 类型别名
pub type IngestResult<T> = Result<T, IngestError>;
