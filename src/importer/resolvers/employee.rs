// ==========================================
// HR 数据分析平台 - 员工解析器
// ==========================================
// 严格模式: 模板固定列名
// 宽松模式: Vendor 花名册表头别名 + status 缺省 "Active"
// 日期解析失败不致失败整行，对应字段置空
// ==========================================

use crate::domain::types::RowErrorKind;
use crate::domain::upload::RowError;
use crate::domain::workforce::Employee;
use crate::importer::shape::EMPLOYEE_NUMBER_ALIASES;
use crate::importer::workbook::RowRecord;
use crate::repository::workforce_repo;
use rusqlite::Transaction;
use tracing::debug;

use super::{db_row_error, EntityResolver, ResolveMode, RowOutcome, RowView, UploadContext};

pub struct EmployeeResolver {
    /// 行来源 sheet 名（模板固定为 Employees，Vendor 模式用实际名）
    pub sheet: String,
}

impl EmployeeResolver {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
        }
    }
}

impl EntityResolver for EmployeeResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, &self.sheet);

        let employee_number = match ctx.mode {
            ResolveMode::Strict => view.text(&["employee_number"]),
            ResolveMode::Lenient => view.text_fuzzy(&EMPLOYEE_NUMBER_ALIASES),
        };
        let employee_number = employee_number.ok_or_else(|| {
            view.error(
                Some("employee_number"),
                RowErrorKind::MissingEmployeeNumber,
                "missing employee_number",
            )
        })?;

        let department_code = match ctx.mode {
            ResolveMode::Strict => view.text(&["department"]),
            ResolveMode::Lenient => view.text_fuzzy(&["department", "departmentcode", "dept"]),
        };
        // 先查同遍映射，再落库查既有行；都未命中时保留冗余代码
        let department_id = match department_code.as_ref() {
            Some(code) => match ctx.department_ids.get(code) {
                Some(id) => Some(id.clone()),
                None => workforce_repo::find_department_id(tx, code)
                    .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?,
            },
            None => None,
        };

        let (hire_date, exit_date, birthdate) = match ctx.mode {
            ResolveMode::Strict => (
                view.date(&["hire_date (YYYY-MM-DD)", "hire_date"]),
                view.date(&["exit_date (YYYY-MM-DD or blank)", "exit_date"]),
                view.date(&["birthdate (YYYY-MM-DD)", "birthdate"]),
            ),
            ResolveMode::Lenient => (
                view.date_fuzzy(&["hiredate", "dateofhire", "datejoined", "joindate"]),
                view.date_fuzzy(&["exitdate", "dateofexit", "terminationdate"]),
                view.date_fuzzy(&["birthdate", "dateofbirth", "dob"]),
            ),
        };

        let status = match ctx.mode {
            ResolveMode::Strict => view.text(&["status"]),
            ResolveMode::Lenient => view
                .text_fuzzy(&["status", "employmentstatus"])
                .or_else(|| Some("Active".to_string())),
        };

        let now = chrono::Utc::now();
        let employee = Employee {
            id: uuid::Uuid::new_v4().to_string(),
            employee_number: employee_number.clone(),
            first_name: match ctx.mode {
                ResolveMode::Strict => view.text(&["first_name"]),
                ResolveMode::Lenient => view.text_fuzzy(&["firstname", "givenname"]),
            },
            last_name: match ctx.mode {
                ResolveMode::Strict => view.text(&["last_name"]),
                ResolveMode::Lenient => view.text_fuzzy(&["lastname", "surname", "familyname"]),
            },
            email: match ctx.mode {
                ResolveMode::Strict => view.text(&["email"]),
                ResolveMode::Lenient => view.text_fuzzy(&["email", "emailaddress", "workemail"]),
            },
            department_id,
            department_code,
            job_title: match ctx.mode {
                ResolveMode::Strict => view.text(&["job_title"]),
                ResolveMode::Lenient => view.text_fuzzy(&["jobtitle", "title", "position"]),
            },
            grade: match ctx.mode {
                ResolveMode::Strict => view.text(&["grade"]),
                ResolveMode::Lenient => view.text_fuzzy(&["grade", "level", "band"]),
            },
            manager_employee_number: match ctx.mode {
                ResolveMode::Strict => view.text(&["manager_employee_number"]),
                ResolveMode::Lenient => {
                    view.text_fuzzy(&["manageremployeenumber", "managerno", "manager"])
                }
            },
            hire_date,
            exit_date,
            status,
            gender: match ctx.mode {
                ResolveMode::Strict => view.text(&["gender"]),
                ResolveMode::Lenient => view.text_fuzzy(&["gender", "sex"]),
            },
            birthdate,
            location: match ctx.mode {
                ResolveMode::Strict => view.text(&["location"]),
                ResolveMode::Lenient => view.text_fuzzy(&["location", "site", "office"]),
            },
            source_file: Some(ctx.source_file.clone()),
            created_at: now,
            updated_at: now,
        };

        let id = workforce_repo::upsert_employee(tx, &employee)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        debug!(employee_number = %employee_number, "员工已落库");

        // 请假/培训等 sheet 依赖该映射回链员工
        ctx.employee_ids.insert(employee_number, id);
        Ok(RowOutcome::Applied)
    }
}
