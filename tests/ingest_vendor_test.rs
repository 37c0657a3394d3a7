// ==========================================
// Vendor 工作簿摄取集成测试
// ==========================================
// 测试目标: 表头嗅探路径（无 UploadMetadata / 列名不规整）
// 覆盖: 花名册+请假表归类 / 缺省字段填充 / 无法识别形态 / CSV 入口
// ==========================================

mod test_helpers;

use hr_ingest::importer::{IngestError, WorkbookIngestor};
use hr_ingest::logging;
use hr_ingest::{SheetMapping, UploadOptions};
use rusqlite::Connection;
use std::io::Write;
use test_helpers::{count_rows, create_orchestrator, create_test_db, sheet, workbook};

#[tokio::test]
async fn test_vendor_roster_and_leave_sheets() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db();
    let orchestrator = create_orchestrator(&db_path);

    let wb = workbook(vec![
        sheet(
            "Sheet1",
            &["Staff No", "First Name", "Surname", "Department", "Hire Date"],
            &[
                &["S-100", "Alice", "Ng", "ENG", "2023-01-09"],
                &["S-101", "Bob", "Okoye", "OPS", "01/15/2024"],
            ],
        ),
        sheet(
            "Absences",
            &["Staff No", "Leave Type", "Start Date", "End Date"],
            &[&["S-100", "ANNUAL", "2025-09-01", "2025-09-05"]],
        ),
        sheet("Notes", &["remark", "author"], &[&["ignore me", "bob"]]),
    ]);

    let summary = orchestrator
        .ingest_workbook(&wb, "vendor-export.xlsx", UploadOptions::default())
        .await
        .expect("vendor ingest should succeed");

    assert_eq!(summary.failed_rows, 0);
    assert!(summary.period.is_none(), "vendor mode has no reporting period");

    let roster = summary
        .sheets
        .iter()
        .find(|s| s.sheet == "Sheet1")
        .expect("roster summary");
    assert_eq!(roster.mapping, Some(SheetMapping::EmployeeRoster));
    assert_eq!(roster.processed_rows, 2);

    let leave = summary
        .sheets
        .iter()
        .find(|s| s.sheet == "Absences")
        .expect("leave summary");
    assert_eq!(leave.mapping, Some(SheetMapping::LeaveTable));
    assert_eq!(leave.processed_rows, 1);

    // 未命中启发式的 sheet 不产生汇总条目
    assert!(summary.sheets.iter().all(|s| s.sheet != "Notes"));

    assert_eq!(count_rows(&db_path, "employees"), 2);
    assert_eq!(count_rows(&db_path, "leave_records"), 1);

    let conn = Connection::open(&db_path).unwrap();
    // 宽松模式缺省填充 + 多格式日期解析
    let (status, hire_date): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT status, hire_date FROM employees WHERE employee_number = 'S-101'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(status.as_deref(), Some("Active"));
    assert_eq!(hire_date.as_deref(), Some("2024-01-15"));

    // 假期类型大小写归一 + 请假回链员工 + 工作日推算
    let (leave_type, leave_status, employee_id, working_days): (
        Option<String>,
        Option<String>,
        Option<String>,
        f64,
    ) = conn
        .query_row(
            "SELECT leave_type, status, employee_id, working_days FROM leave_records",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();
    assert_eq!(leave_type.as_deref(), Some("Annual"));
    assert_eq!(leave_status.as_deref(), Some("Approved"));
    assert!(employee_id.is_some(), "leave linked to roster employee");
    assert_eq!(working_days, 5.0);
}

#[tokio::test]
async fn test_sniffed_roster_header_is_resolvable() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db();
    let orchestrator = create_orchestrator(&db_path);

    // 被嗅探命中的员工号表头别名必须同样被宽松解析命中
    let wb = workbook(vec![sheet(
        "Export",
        &["Emp Number", "First Name", "Department"],
        &[&["S-300", "Fatima", "ENG"], &["S-301", "Gil", "OPS"]],
    )]);

    let summary = orchestrator
        .ingest_workbook(&wb, "emp-number-export.xlsx", UploadOptions::default())
        .await
        .expect("sniffed roster must ingest");

    assert_eq!(summary.failed_rows, 0);
    let roster = summary
        .sheets
        .iter()
        .find(|s| s.sheet == "Export")
        .expect("roster summary");
    assert_eq!(roster.mapping, Some(SheetMapping::EmployeeRoster));
    assert_eq!(roster.processed_rows, 2);
    assert_eq!(count_rows(&db_path, "employees"), 2);
}

#[tokio::test]
async fn test_unrecognized_workbook_shape_writes_nothing() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db();
    let orchestrator = create_orchestrator(&db_path);

    let wb = workbook(vec![sheet(
        "Totals",
        &["region", "headcount"],
        &[&["north", "42"]],
    )]);

    let err = orchestrator
        .ingest_workbook(&wb, "mystery.xlsx", UploadOptions::default())
        .await
        .expect_err("unrecognized shape must fail");
    assert!(matches!(err, IngestError::UnrecognizedWorkbookShape));

    assert_eq!(count_rows(&db_path, "employees"), 0);
    assert_eq!(count_rows(&db_path, "leave_records"), 0);

    let conn = Connection::open(&db_path).unwrap();
    let status: String = conn
        .query_row("SELECT status FROM upload_jobs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(status, "FAILED");
}

#[tokio::test]
async fn test_vendor_leave_missing_staff_number_rolls_back() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db();
    let orchestrator = create_orchestrator(&db_path);

    let wb = workbook(vec![sheet(
        "Absences",
        &["Staff No", "Leave Type", "Start Date", "End Date"],
        &[
            &["S-100", "Annual", "2025-09-01", "2025-09-05"],
            &["", "Sick", "2025-09-10", "2025-09-11"],
        ],
    )]);

    let err = orchestrator
        .ingest_workbook(&wb, "vendor-leave.xlsx", UploadOptions::default())
        .await
        .expect_err("missing staff number must fail the upload");

    match &err {
        IngestError::ValidationFailed { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].row, 3);
            assert_eq!(errors[0].column.as_deref(), Some("employee_number"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // 成功的第一行也随整笔回滚
    assert_eq!(count_rows(&db_path, "leave_records"), 0);
    assert_eq!(count_rows(&db_path, "upload_errors"), 1);
}

#[tokio::test]
async fn test_ingest_vendor_csv_file() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db();
    let orchestrator = create_orchestrator(&db_path);

    let mut csv_file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create csv file");
    writeln!(csv_file, "Staff No,First Name,Department").unwrap();
    writeln!(csv_file, "S-200,Dana,ENG").unwrap();
    writeln!(csv_file, "S-201,Eli,OPS").unwrap();
    csv_file.flush().unwrap();

    let summary = orchestrator
        .ingest_file(csv_file.path(), UploadOptions::default())
        .await
        .expect("csv ingest should succeed");

    assert_eq!(summary.processed_rows, 2);
    assert_eq!(count_rows(&db_path, "employees"), 2);
}

#[tokio::test]
async fn test_ingest_missing_file() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db();
    let orchestrator = create_orchestrator(&db_path);

    let err = orchestrator
        .ingest_file("no_such_dir/no_such_file.xlsx", UploadOptions::default())
        .await
        .expect_err("missing file must fail");
    assert!(matches!(err, IngestError::FileNotFound(_)));
}
