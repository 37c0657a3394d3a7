// ==========================================
// HR 数据分析平台 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 周期性 HR 报表的摄取与台账管理
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 工作簿摄取
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{RowErrorKind, SheetMapping, UploadStatus, WorkbookShape};

// 领域实体
pub use domain::{
    Department, Employee, IngestSummary, LeaveRecord, ReportingPeriod, RowError, SheetSummary,
    UploadError, UploadJob, UploadOptions,
};

// 导入层入口
pub use importer::{
    IngestError, IngestResult, LogEventSink, NoopEventSink, UploadEventSink, UploadOrchestrator,
    WorkbookIngestor,
};

// 配置
pub use config::{get_default_db_path, IngestConfig};

// 仓储入口
pub use repository::{apply_schema, UploadLedger};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "HR 数据分析平台";

// ==========================================
// 预编译检查
// ==========================================
