// ==========================================
// HR 数据分析平台 - 可选 sheet 解析器
// ==========================================
// 共性规则（培训/医务室/入职/离职）:
// - 缺员工号 → 静默跳过（不计 processed/failed）
// - 员工回链: 上下文映射优先, 落库查询兜底; 查不到置空不失败
// - 日期解析失败对应字段置空
// ==========================================

use crate::domain::records::{ExitRecord, OnboardingRecord, SickbayRecord, TrainingRecord};
use crate::domain::upload::RowError;
use crate::importer::workbook::RowRecord;
use crate::repository::{records_repo, workforce_repo};
use rusqlite::Transaction;

use super::{db_row_error, EntityResolver, RowOutcome, RowView, UploadContext};

/// 员工号 → employee_id 回链（映射优先，库查兜底）
fn link_employee(
    tx: &Transaction,
    ctx: &UploadContext,
    sheet: &str,
    row_number: usize,
    employee_number: &str,
) -> Result<Option<String>, RowError> {
    match ctx.employee_ids.get(employee_number) {
        Some(id) => Ok(Some(id.clone())),
        None => workforce_repo::find_employee_id(tx, employee_number)
            .map_err(|e| db_row_error(sheet, row_number, e)),
    }
}

// ==========================================
// 培训记录（L&D）
// ==========================================
pub struct TrainingResolver {
    pub sheet: String,
}

impl TrainingResolver {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
        }
    }
}

impl EntityResolver for TrainingResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, &self.sheet);

        let employee_number = match view.text(&["employee_number"]) {
            Some(number) => number,
            None => return Ok(RowOutcome::SkippedMissingLink),
        };
        let employee_id = link_employee(tx, ctx, &self.sheet, row.row_number, &employee_number)?;

        let record = TrainingRecord {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            employee_number,
            course_name: view.text(&["course_name"]),
            start_date: view.date(&["start_date"]),
            end_date: view.date(&["end_date"]),
            status: view.text(&["status"]),
            cost: view.number(&["cost"]),
            provider: view.text(&["provider"]),
            notes: view.text(&["notes"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::insert_training(tx, &record)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}

// ==========================================
// 医务室记录（Sickbay）
// ==========================================
pub struct SickbayResolver {
    pub sheet: String,
}

impl SickbayResolver {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
        }
    }
}

impl EntityResolver for SickbayResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, &self.sheet);

        let employee_number = match view.text(&["employee_number"]) {
            Some(number) => number,
            None => return Ok(RowOutcome::SkippedMissingLink),
        };
        let employee_id = link_employee(tx, ctx, &self.sheet, row.row_number, &employee_number)?;

        let record = SickbayRecord {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            employee_number,
            date: view.date(&["date (YYYY-MM-DD)", "date"]),
            hours_off: view.number(&["hours_off"]),
            reason: view.text(&["reason"]),
            approved_by_employee_number: view.text(&["approved_by_employee_number"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::insert_sickbay(tx, &record)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}

// ==========================================
// 入职活动记录（Onboarding）
// ==========================================
pub struct OnboardingResolver {
    pub sheet: String,
}

impl OnboardingResolver {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
        }
    }
}

impl EntityResolver for OnboardingResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, &self.sheet);

        let employee_number = match view.text(&["employee_number"]) {
            Some(number) => number,
            None => return Ok(RowOutcome::SkippedMissingLink),
        };
        let employee_id = link_employee(tx, ctx, &self.sheet, row.row_number, &employee_number)?;

        let record = OnboardingRecord {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            employee_number,
            onboard_date: view.date(&["onboard_date"]),
            activity: view.text(&["activity"]),
            status: view.text(&["status"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::insert_onboarding(tx, &record)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}

// ==========================================
// 离职记录（Exits）
// ==========================================
pub struct ExitResolver {
    pub sheet: String,
}

impl ExitResolver {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
        }
    }
}

impl EntityResolver for ExitResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, &self.sheet);

        let employee_number = match view.text(&["employee_number"]) {
            Some(number) => number,
            None => return Ok(RowOutcome::SkippedMissingLink),
        };
        let employee_id = link_employee(tx, ctx, &self.sheet, row.row_number, &employee_number)?;

        let record = ExitRecord {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            employee_number,
            exit_date: view.date(&["exit_date"]),
            reason: view.text(&["reason"]),
            notice_period_days: view.number(&["notice_period_days"]).map(|n| n as i64),
            last_working_date: view.date(&["last_working_date"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::insert_exit(tx, &record)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}
