// ==========================================
// HR 数据分析平台 - 空缺岗位解析器
// ==========================================

use crate::domain::records::Vacancy;
use crate::domain::upload::RowError;
use crate::importer::contract::SHEET_VACANCIES;
use crate::importer::workbook::RowRecord;
use crate::repository::{records_repo, workforce_repo};
use rusqlite::Transaction;

use super::{db_row_error, EntityResolver, RowOutcome, RowView, UploadContext};

/// 空缺岗位按部门代码回链部门（查不到置空不失败）
pub struct VacancyResolver;

impl EntityResolver for VacancyResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, SHEET_VACANCIES);

        let department_code = view.text(&["department_code"]);
        let department_id = match department_code.as_ref() {
            Some(code) => match ctx.department_ids.get(code) {
                Some(id) => Some(id.clone()),
                None => workforce_repo::find_department_id(tx, code)
                    .map_err(|e| db_row_error(SHEET_VACANCIES, row.row_number, e))?,
            },
            None => None,
        };

        let record = Vacancy {
            id: uuid::Uuid::new_v4().to_string(),
            department_id,
            department_code,
            vacancy_id: view.text(&["vacancy_id"]),
            cadre: view.text(&["cadre"]),
            status: view.text(&["status"]),
            posted_date: view.date(&["posted_date"]),
            filled_date: view.date(&["filled_date"]),
            cost_per_hire: view.number(&["cost_per_hire"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::insert_vacancy(tx, &record)
            .map_err(|e| db_row_error(SHEET_VACANCIES, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}
