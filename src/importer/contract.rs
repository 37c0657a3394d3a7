// ==========================================
// HR 数据分析平台 - 模板列契约与校验
// ==========================================
// 模板工作簿的 sheet/列契约是系统对外的固定约定，
// 同时被上传模板生成器（外部协作方）消费。
// 严格模式 sheet 的表头必须与契约集合完全一致（双向比对）。
// ==========================================

use crate::importer::error::{IngestError, IngestResult};
use std::collections::HashSet;

pub const SHEET_EMPLOYEES: &str = "Employees";
pub const SHEET_DEPARTMENTS: &str = "Departments";
pub const SHEET_LEAVE: &str = "Leave";
pub const SHEET_UPLOAD_METADATA: &str = "UploadMetadata";
pub const SHEET_TRAINING: &str = "L&D";
pub const SHEET_SICKBAY: &str = "Sickbay";
pub const SHEET_ONBOARDING: &str = "Onboarding";
pub const SHEET_EXITS: &str = "Exits";
pub const SHEET_VACANCIES: &str = "Vacancies";
pub const SHEET_ENGAGEMENT: &str = "Engagement";
pub const SHEET_STATUTORY: &str = "StatutoryCompliance";

/// 模板模式必需 sheet（缺失即结构性失败）
pub const REQUIRED_SHEETS: [&str; 4] = [
    SHEET_EMPLOYEES,
    SHEET_DEPARTMENTS,
    SHEET_LEAVE,
    SHEET_UPLOAD_METADATA,
];

/// 模板模式可选 sheet（缺失时静默跳过）
pub const OPTIONAL_SHEETS: [&str; 7] = [
    SHEET_TRAINING,
    SHEET_SICKBAY,
    SHEET_ONBOARDING,
    SHEET_EXITS,
    SHEET_VACANCIES,
    SHEET_ENGAGEMENT,
    SHEET_STATUTORY,
];

pub const EMPLOYEES_COLUMNS: [&str; 14] = [
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

pub const DEPARTMENTS_COLUMNS: [&str; 4] = [
    "department_code",
    "department_name",
    "parent_department_code",
    "head_employee_number",
];

pub const LEAVE_COLUMNS: [&str; 8] = [
    "employee_number",
    "leave_type",
    "start_date (YYYY-MM-DD)",
    "end_date (YYYY-MM-DD)",
    "working_days",
    "status",
    "reason",
    "source_reference",
];

pub const TRAINING_COLUMNS: [&str; 8] = [
    "employee_number",
    "course_name",
    "start_date",
    "end_date",
    "status",
    "cost",
    "provider",
    "notes",
];

pub const SICKBAY_COLUMNS: [&str; 5] = [
    "employee_number",
    "date (YYYY-MM-DD)",
    "hours_off",
    "reason",
    "approved_by_employee_number",
];

pub const ONBOARDING_COLUMNS: [&str; 4] = ["employee_number", "onboard_date", "activity", "status"];

pub const EXITS_COLUMNS: [&str; 5] = [
    "employee_number",
    "exit_date",
    "reason",
    "notice_period_days",
    "last_working_date",
];

pub const VACANCIES_COLUMNS: [&str; 7] = [
    "department_code",
    "vacancy_id",
    "cadre",
    "status",
    "posted_date",
    "filled_date",
    "cost_per_hire",
];

pub const ENGAGEMENT_COLUMNS: [&str; 4] = [
    "period (YYYY-MM)",
    "department_code",
    "metric_name",
    "metric_value",
];

pub const STATUTORY_COLUMNS: [&str; 4] = ["item", "due_date", "status", "notes"];

pub const UPLOAD_METADATA_COLUMNS: [&str; 5] = [
    "uploader",
    "upload_date (YYYY-MM-DDTHH:MM:SSZ)",
    "reporting_period_start",
    "reporting_period_end",
    "source_file_name",
];

/// 按 sheet 名取模板列契约
pub fn expected_columns(sheet: &str) -> Option<&'static [&'static str]> {
    match sheet {
        SHEET_EMPLOYEES => Some(&EMPLOYEES_COLUMNS),
        SHEET_DEPARTMENTS => Some(&DEPARTMENTS_COLUMNS),
        SHEET_LEAVE => Some(&LEAVE_COLUMNS),
        SHEET_TRAINING => Some(&TRAINING_COLUMNS),
        SHEET_SICKBAY => Some(&SICKBAY_COLUMNS),
        SHEET_ONBOARDING => Some(&ONBOARDING_COLUMNS),
        SHEET_EXITS => Some(&EXITS_COLUMNS),
        SHEET_VACANCIES => Some(&VACANCIES_COLUMNS),
        SHEET_ENGAGEMENT => Some(&ENGAGEMENT_COLUMNS),
        SHEET_STATUTORY => Some(&STATUTORY_COLUMNS),
        SHEET_UPLOAD_METADATA => Some(&UPLOAD_METADATA_COLUMNS),
        _ => None,
    }
}

/// 严格模式表头校验（集合双向比对）
///
/// 缺失列与多余列分别列出，任一非空即 InvalidColumns
pub fn validate_columns(
    headers: &[String],
    expected: &[&str],
    sheet: &str,
) -> IngestResult<()> {
    let observed: HashSet<&str> = headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();
    let expected_set: HashSet<&str> = expected.iter().copied().collect();

    let mut missing: Vec<String> = expected_set
        .difference(&observed)
        .map(|s| s.to_string())
        .collect();
    let mut unexpected: Vec<String> = observed
        .difference(&expected_set)
        .map(|s| s.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        return Ok(());
    }

    missing.sort();
    unexpected.sort();
    Err(IngestError::InvalidColumns {
        sheet: sheet.to_string(),
        missing,
        unexpected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_exact_match_passes() {
        let result = validate_columns(&headers(&DEPARTMENTS_COLUMNS), &DEPARTMENTS_COLUMNS, "Departments");
        assert!(result.is_ok());
    }

    #[test]
    fn test_headers_trimmed_before_compare() {
        let observed = headers(&[
            " department_code ",
            "department_name",
            "parent_department_code",
            "head_employee_number",
        ]);
        assert!(validate_columns(&observed, &DEPARTMENTS_COLUMNS, "Departments").is_ok());
    }

    #[test]
    fn test_missing_and_unexpected_reported_separately() {
        let observed = headers(&["department_code", "department_name", "surprise_column"]);
        let err = validate_columns(&observed, &DEPARTMENTS_COLUMNS, "Departments").unwrap_err();
        match err {
            IngestError::InvalidColumns {
                sheet,
                missing,
                unexpected,
            } => {
                assert_eq!(sheet, "Departments");
                assert_eq!(
                    missing,
                    vec!["head_employee_number".to_string(), "parent_department_code".to_string()]
                );
                assert_eq!(unexpected, vec!["surprise_column".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
