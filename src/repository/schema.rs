// ==========================================
// HR 数据分析平台 - 内置引导 Schema
// ==========================================
// 表集合与线上迁移保持一致；此处仅做 IF NOT EXISTS 引导，
// 正式迁移机制不在本 crate 范围内。
// 日期以 ISO-8601 文本存储（天粒度 YYYY-MM-DD，可按字典序比较）。
// ==========================================

use crate::importer::error::IngestResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS departments (
    id TEXT PRIMARY KEY,
    department_code TEXT NOT NULL UNIQUE,
    department_name TEXT,
    parent_department_code TEXT,
    head_employee_number TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    id TEXT PRIMARY KEY,
    employee_number TEXT NOT NULL UNIQUE,
    first_name TEXT,
    last_name TEXT,
    email TEXT,
    department_id TEXT REFERENCES departments(id),
    department_code TEXT,
    job_title TEXT,
    grade TEXT,
    manager_employee_number TEXT,
    hire_date TEXT,
    exit_date TEXT,
    status TEXT,
    gender TEXT,
    birthdate TEXT,
    location TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS leave_records (
    id TEXT PRIMARY KEY,
    employee_id TEXT REFERENCES employees(id),
    employee_number TEXT NOT NULL,
    leave_type TEXT,
    start_date TEXT NOT NULL,
    end_date TEXT NOT NULL,
    working_days REAL NOT NULL,
    status TEXT,
    reason TEXT,
    source_reference TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (employee_number, start_date, end_date)
);

CREATE TABLE IF NOT EXISTS training_records (
    id TEXT PRIMARY KEY,
    employee_id TEXT REFERENCES employees(id),
    employee_number TEXT NOT NULL,
    course_name TEXT,
    start_date TEXT,
    end_date TEXT,
    status TEXT,
    cost REAL,
    provider TEXT,
    notes TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sickbay_records (
    id TEXT PRIMARY KEY,
    employee_id TEXT REFERENCES employees(id),
    employee_number TEXT NOT NULL,
    date TEXT,
    hours_off REAL,
    reason TEXT,
    approved_by_employee_number TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS onboarding_records (
    id TEXT PRIMARY KEY,
    employee_id TEXT REFERENCES employees(id),
    employee_number TEXT NOT NULL,
    onboard_date TEXT,
    activity TEXT,
    status TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exit_records (
    id TEXT PRIMARY KEY,
    employee_id TEXT REFERENCES employees(id),
    employee_number TEXT NOT NULL,
    exit_date TEXT,
    reason TEXT,
    notice_period_days INTEGER,
    last_working_date TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vacancies (
    id TEXT PRIMARY KEY,
    department_id TEXT REFERENCES departments(id),
    department_code TEXT,
    vacancy_id TEXT,
    cadre TEXT,
    status TEXT,
    posted_date TEXT,
    filled_date TEXT,
    cost_per_hire REAL,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS engagement_metrics (
    id TEXT PRIMARY KEY,
    period TEXT NOT NULL,
    department_code TEXT,
    metric_name TEXT NOT NULL,
    metric_value REAL,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS statutory_compliance (
    id TEXT PRIMARY KEY,
    item TEXT,
    due_date TEXT,
    status TEXT,
    notes TEXT,
    source_file TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS upload_jobs (
    id TEXT PRIMARY KEY,
    filename TEXT NOT NULL,
    uploader TEXT NOT NULL,
    status TEXT NOT NULL,
    processed_rows INTEGER NOT NULL DEFAULT 0,
    failed_rows INTEGER NOT NULL DEFAULT 0,
    period_start TEXT,
    period_end TEXT,
    error_summary TEXT,
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS upload_errors (
    id TEXT PRIMARY KEY,
    upload_id TEXT NOT NULL REFERENCES upload_jobs(id),
    sheet TEXT NOT NULL,
    row_number INTEGER NOT NULL,
    column_name TEXT,
    message TEXT NOT NULL,
    sample TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_leave_employee_range
    ON leave_records (employee_number, start_date, end_date);
CREATE INDEX IF NOT EXISTS idx_engagement_key
    ON engagement_metrics (period, metric_name, department_code);
CREATE INDEX IF NOT EXISTS idx_upload_errors_upload
    ON upload_errors (upload_id);
"#;

/// 应用引导 Schema（幂等）
pub fn apply_schema(conn: &Connection) -> IngestResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
