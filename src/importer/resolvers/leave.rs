// ==========================================
// HR 数据分析平台 - 请假解析器
// ==========================================
// 业务不变式: 同一员工的请假区间两两不重叠
// - (员工, 起始, 结束) 完全一致 → 字段合并（幂等重传）
// - 区间重叠但不一致 → 信息性跳过（不计失败）
// - working_days 显式非零值优先，否则按节假日日历推算
// ==========================================

use crate::domain::leave::LeaveRecord;
use crate::domain::types::RowErrorKind;
use crate::domain::upload::RowError;
use crate::importer::dates;
use crate::importer::shape::EMPLOYEE_NUMBER_ALIASES;
use crate::importer::workbook::RowRecord;
use crate::repository::{leave_repo, workforce_repo};
use rusqlite::Transaction;
use tracing::info;

use super::{db_row_error, EntityResolver, ResolveMode, RowOutcome, RowView, UploadContext};

pub struct LeaveResolver {
    pub sheet: String,
}

impl LeaveResolver {
    pub fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
        }
    }
}

/// 假期类型大小写归一（"ANNUAL" → "Annual"）
fn normalize_leave_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

impl EntityResolver for LeaveResolver {
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

        let start_date = match ctx.mode {
            ResolveMode::Strict => view.date(&["start_date (YYYY-MM-DD)", "start_date"]),
            ResolveMode::Lenient => {
                view.date_fuzzy(&["startdate", "startdateyyyymmdd", "leavestart", "leavefrom", "from"])
            }
        };
        let start_date = start_date.ok_or_else(|| {
            view.error(
                Some("start_date"),
                RowErrorKind::InvalidDates,
                "invalid or missing start_date",
            )
        })?;

        let end_date = match ctx.mode {
            ResolveMode::Strict => view.date(&["end_date (YYYY-MM-DD)", "end_date"]),
            ResolveMode::Lenient => {
                view.date_fuzzy(&["enddate", "enddateyyyymmdd", "leaveend", "leaveto", "to"])
            }
        };
        let end_date = end_date.ok_or_else(|| {
            view.error(
                Some("end_date"),
                RowErrorKind::InvalidDates,
                "invalid or missing end_date",
            )
        })?;

        let employee_id = match ctx.employee_ids.get(&employee_number) {
            Some(id) => Some(id.clone()),
            None => workforce_repo::find_employee_id(tx, &employee_number)
                .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?,
        };

        let explicit_days = match ctx.mode {
            ResolveMode::Strict => view.number(&["working_days"]),
            ResolveMode::Lenient => view.number_fuzzy(&["workingdays", "days", "numdays"]),
        };
        let working_days = match explicit_days {
            Some(days) if days > 0.0 => days,
            _ => dates::working_days_between(start_date, end_date, &ctx.holidays) as f64,
        };

        let leave_type = match ctx.mode {
            ResolveMode::Strict => view.text(&["leave_type"]),
            ResolveMode::Lenient => view.text_fuzzy(&["leavetype", "absencetype", "typeofleave"]),
        }
        .map(|t| normalize_leave_type(&t));

        let status = match ctx.mode {
            ResolveMode::Strict => view.text(&["status"]),
            ResolveMode::Lenient => view
                .text_fuzzy(&["status", "approvalstatus"])
                .or_else(|| Some("Approved".to_string())),
        };

        let record = LeaveRecord {
            id: uuid::Uuid::new_v4().to_string(),
            employee_id,
            employee_number: employee_number.clone(),
            leave_type,
            start_date,
            end_date,
            working_days,
            status,
            reason: match ctx.mode {
                ResolveMode::Strict => view.text(&["reason"]),
                ResolveMode::Lenient => view.text_fuzzy(&["reason", "comments"]),
            },
            source_reference: match ctx.mode {
                ResolveMode::Strict => view.text(&["source_reference"]),
                ResolveMode::Lenient => view.text_fuzzy(&["sourcereference", "reference", "ref"]),
            },
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        let start_key = start_date.to_string();
        let end_key = end_date.to_string();

        // 先判完全一致（幂等合并），再判区间重叠（重复跳过）
        let exact = leave_repo::find_exact(tx, &employee_number, &start_key, &end_key)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        if let Some(existing_id) = exact {
            leave_repo::merge_leave(tx, &existing_id, &record)
                .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
            accumulate_period_days(ctx, &record);
            return Ok(RowOutcome::Applied);
        }

        let overlapping = leave_repo::find_overlapping(tx, &employee_number, &start_key, &end_key)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        if overlapping.is_some() {
            info!(
                employee_number = %employee_number,
                start = %start_key,
                end = %end_key,
                "请假区间与既有记录重叠, 按重复跳过"
            );
            return Ok(RowOutcome::SkippedDuplicateOverlap);
        }

        leave_repo::insert_leave(tx, &record)
            .map_err(|e| db_row_error(&self.sheet, row.row_number, e))?;
        accumulate_period_days(ctx, &record);
        Ok(RowOutcome::Applied)
    }
}

/// 汇总输出: 请假工作日按自然月分摊
fn accumulate_period_days(ctx: &mut UploadContext, record: &LeaveRecord) {
    let split = dates::split_across_periods(record.start_date, record.end_date, &ctx.holidays);
    for (period, days) in split {
        *ctx.leave_days_by_period.entry(period).or_insert(0) += days;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_type_case_normalized() {
        assert_eq!(normalize_leave_type("ANNUAL"), "Annual");
        assert_eq!(normalize_leave_type("sick"), "Sick");
        assert_eq!(normalize_leave_type(" Maternity "), "Maternity");
        assert_eq!(normalize_leave_type(""), "");
    }
}
