// ==========================================
// HR 数据分析平台 - 配置层
// ==========================================
// 职责: 进程级导入配置（节假日日历/数据目录）
// 来源: 环境变量 + JSON 配置文件
// ==========================================

pub mod ingest_config;

// 重导出核心配置类型
pub use ingest_config::{get_default_db_path, IngestConfig};
