// ==========================================
// HR 数据分析平台 - 命令行主入口
// ==========================================
// 用法: hr-ingest <workbook.xlsx|csv> [更多文件...]
// 输出: 每个文件的摄取汇总（JSON）
// ==========================================

use hr_ingest::config::{get_default_db_path, IngestConfig};
use hr_ingest::db::open_sqlite_connection;
use hr_ingest::domain::UploadOptions;
use hr_ingest::importer::{LogEventSink, UploadOrchestrator, WorkbookIngestor};
use hr_ingest::repository::apply_schema;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    hr_ingest::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", hr_ingest::APP_NAME);
    tracing::info!("系统版本: {}", hr_ingest::VERSION);
    tracing::info!("==================================================");

    let files: Vec<String> = std::env::args().skip(1).collect();
    if files.is_empty() {
        eprintln!("用法: hr-ingest <workbook.xlsx|csv> [更多文件...]");
        std::process::exit(2);
    }

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let conn = open_sqlite_connection(&db_path)?;
    apply_schema(&conn)?;

    let config = IngestConfig::from_env();
    let orchestrator = UploadOrchestrator::new(
        Arc::new(Mutex::new(conn)),
        config,
        Box::new(LogEventSink),
    );

    let options = UploadOptions {
        uploader: Some("cli".to_string()),
        ..UploadOptions::default()
    };

    let results = orchestrator.batch_ingest(files, options).await;

    let mut exit_code = 0;
    for result in &results {
        match result {
            Ok(summary) => {
                println!("{}", serde_json::to_string_pretty(summary)?);
            }
            Err(message) => {
                eprintln!("{}", message);
                exit_code = 1;
            }
        }
    }
    std::process::exit(exit_code);
}
