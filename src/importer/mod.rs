// ==========================================
// HR 数据分析平台 - 导入层
// ==========================================
// 职责: 上传工作簿摄取, 从文件到数据库
// 支持: Excel (.xlsx/.xls), CSV
// 流程: 形态判定 → 清洗 → 契约校验 → 解析落库 → 聚合裁决
// ==========================================

// 模块声明
pub mod contract;
pub mod dates;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod resolvers;
pub mod sanitizer;
pub mod shape;
pub mod workbook;

// 重导出核心类型
pub use error::{IngestError, IngestResult};
pub use events::{LogEventSink, NoopEventSink, UploadEventSink};
pub use orchestrator::{UploadOrchestrator, WorkbookIngestor};
pub use resolvers::{EntityResolver, ResolveMode, RowOutcome, UploadContext};
pub use workbook::{load_workbook, Cell, RowRecord, Sheet, Workbook};
