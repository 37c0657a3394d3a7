// ==========================================
// 集成测试辅助
// ==========================================
// 职责: 测试数据库构建 + 内存工作簿构造器
// ==========================================

use hr_ingest::config::IngestConfig;
use hr_ingest::importer::{Cell, NoopEventSink, RowRecord, Sheet, UploadOrchestrator, Workbook};
use hr_ingest::repository::{apply_schema, records_repo};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建测试数据库（schema 已应用）
///
/// 返回 (临时文件句柄, 路径)；句柄保持存活以防文件被清理
pub fn create_test_db() -> (NamedTempFile, String) {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().display().to_string();

    let conn = Connection::open(&db_path).expect("Failed to open db");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("Failed to set pragma");
    apply_schema(&conn).expect("Failed to apply schema");

    (temp_file, db_path)
}

/// 创建测试编排器（空节假日日历 + 静默事件接收器）
pub fn create_orchestrator(db_path: &str) -> UploadOrchestrator {
    let conn = Connection::open(db_path).expect("Failed to open db");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("Failed to set pragma");
    UploadOrchestrator::new(
        Arc::new(Mutex::new(conn)),
        IngestConfig::default(),
        Box::new(NoopEventSink),
    )
}

/// 构造单个 sheet（全文本单元格，行号含表头偏移）
pub fn sheet(name: &str, headers: &[&str], rows: &[&[&str]]) -> Sheet {
    let header_list: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, values)| {
            let mut cells = HashMap::new();
            for (header, value) in headers.iter().zip(values.iter()) {
                if !value.is_empty() {
                    cells.insert(header.to_string(), Cell::Text(value.to_string()));
                }
            }
            RowRecord {
                row_number: idx + 2,
                cells,
            }
        })
        .collect();

    Sheet {
        name: name.to_string(),
        headers: header_list,
        rows: records,
    }
}

/// 构造工作簿
pub fn workbook(sheets: Vec<Sheet>) -> Workbook {
    Workbook { sheets }
}

pub const EMPLOYEES_HEADERS: [&str; 14] = [
    "employee_number",
    "first_name",
    "last_name",
    "email",
    "department",
    "job_title",
    "grade",
    "manager_employee_number",
    "hire_date (YYYY-MM-DD)",
    "exit_date (YYYY-MM-DD or blank)",
    "status",
    "gender",
    "birthdate (YYYY-MM-DD)",
    "location",
];

pub const DEPARTMENTS_HEADERS: [&str; 4] = [
    "department_code",
    "department_name",
    "parent_department_code",
    "head_employee_number",
];

pub const LEAVE_HEADERS: [&str; 8] = [
    "employee_number",
    "leave_type",
    "start_date (YYYY-MM-DD)",
    "end_date (YYYY-MM-DD)",
    "working_days",
    "status",
    "reason",
    "source_reference",
];

pub const METADATA_HEADERS: [&str; 5] = [
    "uploader",
    "upload_date (YYYY-MM-DDTHH:MM:SSZ)",
    "reporting_period_start",
    "reporting_period_end",
    "source_file_name",
];

/// 员工行（必填字段之外留空）
pub fn employee_row(number: &str, first: &str, dept: &str, hire_date: &str) -> Vec<String> {
    vec![
        number.to_string(),
        first.to_string(),
        "Tester".to_string(),
        format!("{}@example.com", first.to_lowercase()),
        dept.to_string(),
        "Analyst".to_string(),
        "G5".to_string(),
        String::new(),
        hire_date.to_string(),
        String::new(),
        "Active".to_string(),
        String::new(),
        String::new(),
        "HQ".to_string(),
    ]
}

/// 标准模板工作簿: 2 部门 / 3 员工 / 2 条请假
pub fn standard_template_workbook() -> Workbook {
    let owned_employees: Vec<Vec<String>> = vec![
        employee_row("E001", "Alice", "ENG", "2023-01-09"),
        employee_row("E002", "Bob", "ENG", "2024-03-04"),
        employee_row("E003", "Carol", "OPS", "2022-07-18"),
    ];
    let employee_refs: Vec<Vec<&str>> = owned_employees
        .iter()
        .map(|row| row.iter().map(|s| s.as_str()).collect())
        .collect();
    let employee_rows: Vec<&[&str]> = employee_refs.iter().map(|row| row.as_slice()).collect();

    workbook(vec![
        sheet(
            "UploadMetadata",
            &METADATA_HEADERS,
            &[&[
                "hr-admin",
                "2025-10-01T08:00:00Z",
                "2025-09-01",
                "2025-09-30",
                "september.xlsx",
            ]],
        ),
        sheet(
            "Departments",
            &DEPARTMENTS_HEADERS,
            &[
                &["ENG", "Engineering", "", "E001"],
                &["OPS", "Operations", "", "E003"],
            ],
        ),
        sheet("Employees", &EMPLOYEES_HEADERS, &employee_rows),
        sheet(
            "Leave",
            &LEAVE_HEADERS,
            &[
                &["E001", "Annual", "2025-09-01", "2025-09-05", "", "Approved", "", "LV-1"],
                &["E002", "Sick", "2025-09-10", "2025-09-11", "2", "Approved", "flu", "LV-2"],
            ],
        ),
    ])
}

/// 统计表行数
pub fn count_rows(db_path: &str, table: &str) -> i64 {
    let conn = Connection::open(db_path).expect("Failed to open db");
    records_repo::count_table_rows(&conn, table).expect("Failed to count rows")
}
