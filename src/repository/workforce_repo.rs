// ==========================================
// HR 数据分析平台 - 组织/员工 Repository
// ==========================================
// 职责: 部门与员工的事务内 upsert 与自然键查询
// 红线: Repository 不含业务规则，只做数据 CRUD
// upsert 语义: 命中自然键时保留既有 id，整体覆盖可变字段
// ==========================================

use crate::domain::workforce::{Department, Employee};
use crate::importer::error::IngestResult;
use rusqlite::{params, OptionalExtension, Transaction};

/// 按 department_code upsert，返回持久化后的 id
pub fn upsert_department(tx: &Transaction, dept: &Department) -> IngestResult<String> {
    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM departments WHERE department_code = ?1",
            params![dept.department_code],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(id) => {
            tx.execute(
                r#"
                UPDATE departments
                SET department_name = ?2,
                    parent_department_code = ?3,
                    head_employee_number = ?4,
                    source_file = ?5,
                    updated_at = ?6
                WHERE id = ?1
                "#,
                params![
                    id,
                    dept.department_name,
                    dept.parent_department_code,
                    dept.head_employee_number,
                    dept.source_file,
                    dept.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(id)
        }
        None => {
            tx.execute(
                r#"
                INSERT INTO departments (
                    id, department_code, department_name, parent_department_code,
                    head_employee_number, source_file, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    dept.id,
                    dept.department_code,
                    dept.department_name,
                    dept.parent_department_code,
                    dept.head_employee_number,
                    dept.source_file,
                    dept.created_at.to_rfc3339(),
                    dept.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(dept.id.clone())
        }
    }
}

/// 按 employee_number upsert（后写覆盖），返回持久化后的 id
pub fn upsert_employee(tx: &Transaction, emp: &Employee) -> IngestResult<String> {
    let existing: Option<String> = tx
        .query_row(
            "SELECT id FROM employees WHERE employee_number = ?1",
            params![emp.employee_number],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(id) => {
            tx.execute(
                r#"
                UPDATE employees
                SET first_name = ?2,
                    last_name = ?3,
                    email = ?4,
                    department_id = ?5,
                    department_code = ?6,
                    job_title = ?7,
                    grade = ?8,
                    manager_employee_number = ?9,
                    hire_date = ?10,
                    exit_date = ?11,
                    status = ?12,
                    gender = ?13,
                    birthdate = ?14,
                    location = ?15,
                    source_file = ?16,
                    updated_at = ?17
                WHERE id = ?1
                "#,
                params![
                    id,
                    emp.first_name,
                    emp.last_name,
                    emp.email,
                    emp.department_id,
                    emp.department_code,
                    emp.job_title,
                    emp.grade,
                    emp.manager_employee_number,
                    emp.hire_date.map(|d| d.to_string()),
                    emp.exit_date.map(|d| d.to_string()),
                    emp.status,
                    emp.gender,
                    emp.birthdate.map(|d| d.to_string()),
                    emp.location,
                    emp.source_file,
                    emp.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(id)
        }
        None => {
            tx.execute(
                r#"
                INSERT INTO employees (
                    id, employee_number, first_name, last_name, email,
                    department_id, department_code, job_title, grade,
                    manager_employee_number, hire_date, exit_date, status,
                    gender, birthdate, location, source_file, created_at, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)
                "#,
                params![
                    emp.id,
                    emp.employee_number,
                    emp.first_name,
                    emp.last_name,
                    emp.email,
                    emp.department_id,
                    emp.department_code,
                    emp.job_title,
                    emp.grade,
                    emp.manager_employee_number,
                    emp.hire_date.map(|d| d.to_string()),
                    emp.exit_date.map(|d| d.to_string()),
                    emp.status,
                    emp.gender,
                    emp.birthdate.map(|d| d.to_string()),
                    emp.location,
                    emp.source_file,
                    emp.created_at.to_rfc3339(),
                    emp.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(emp.id.clone())
        }
    }
}

/// 按员工号查 id（同事务可见性覆盖本遍内先写入的行）
pub fn find_employee_id(tx: &Transaction, employee_number: &str) -> IngestResult<Option<String>> {
    let id = tx
        .query_row(
            "SELECT id FROM employees WHERE employee_number = ?1",
            params![employee_number],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// 按部门代码查 id
pub fn find_department_id(tx: &Transaction, department_code: &str) -> IngestResult<Option<String>> {
    let id = tx
        .query_row(
            "SELECT id FROM departments WHERE department_code = ?1",
            params![department_code],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}
