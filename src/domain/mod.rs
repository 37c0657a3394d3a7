// ==========================================
// HR 数据分析平台 - 领域层
// ==========================================
// 职责: 导入管线涉及的实体与值类型
// 红线: 领域结构不含数据访问逻辑
// ==========================================

pub mod leave;
pub mod records;
pub mod types;
pub mod upload;
pub mod workforce;

// 重导出核心类型
pub use leave::LeaveRecord;
pub use records::{
    EngagementMetric, ExitRecord, OnboardingRecord, SickbayRecord, StatutoryComplianceItem,
    TrainingRecord, Vacancy,
};
pub use types::{RowErrorKind, SheetMapping, UploadStatus, WorkbookShape};
pub use upload::{
    IngestSummary, ReportingPeriod, RowError, SheetSummary, UploadError, UploadJob, UploadOptions,
};
pub use workforce::{Department, Employee};
