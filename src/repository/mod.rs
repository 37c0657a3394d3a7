// ==========================================
// HR 数据分析平台 - 数据仓储层
// ==========================================
// 职责: 基于 rusqlite 的数据访问（不含业务规则）
// 约定: 业务实体写入统一接收 &Transaction，
//       由编排器持有整次上传的唯一业务事务
// ==========================================

pub mod leave_repo;
pub mod records_repo;
pub mod schema;
pub mod upload_repo;
pub mod workforce_repo;

// 重导出核心类型
pub use schema::apply_schema;
pub use upload_repo::UploadLedger;
