// ==========================================
// HR 数据分析平台 - 部门解析器
// ==========================================

use crate::domain::types::RowErrorKind;
use crate::domain::upload::RowError;
use crate::domain::workforce::Department;
use crate::importer::contract::SHEET_DEPARTMENTS;
use crate::importer::workbook::RowRecord;
use crate::repository::workforce_repo;
use rusqlite::Transaction;

use super::{db_row_error, EntityResolver, RowOutcome, RowView, UploadContext};

/// 部门按 department_code 幂等 upsert，并刷新上下文映射表
pub struct DepartmentResolver;

impl EntityResolver for DepartmentResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, SHEET_DEPARTMENTS);

        let department_code = view.text(&["department_code"]).ok_or_else(|| {
            view.error(
                Some("department_code"),
                RowErrorKind::MissingDepartmentCode,
                "missing department_code",
            )
        })?;

        let now = chrono::Utc::now();
        let department = Department {
            id: uuid::Uuid::new_v4().to_string(),
            department_code: department_code.clone(),
            department_name: view.text(&["department_name"]),
            parent_department_code: view.text(&["parent_department_code"]),
            head_employee_number: view.text(&["head_employee_number"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: now,
            updated_at: now,
        };

        let id = workforce_repo::upsert_department(tx, &department)
            .map_err(|e| db_row_error(SHEET_DEPARTMENTS, row.row_number, e))?;

        // 后续 Employees/Vacancies 解析依赖该映射做外键挂接
        ctx.department_ids.insert(department_code, id);
        Ok(RowOutcome::Applied)
    }
}
