// ==========================================
// HR 数据分析平台 - 工作簿形态探测
// ==========================================
// 模板判定: 纯结构检查（必需 sheet 是否齐全），不看表头
// Vendor 嗅探: 按表头启发式把 sheet 归类为花名册/请假表
// ==========================================

use crate::domain::types::{SheetMapping, WorkbookShape};
use crate::importer::contract::REQUIRED_SHEETS;

/// 模板工作簿判定: 必需 sheet 全部在场
///
/// 每个工作簿只做一次，先于任何行处理
pub fn is_template(sheet_names: &[String]) -> bool {
    REQUIRED_SHEETS
        .iter()
        .all(|required| sheet_names.iter().any(|name| name == required))
}

/// 工作簿形态判定
pub fn detect(sheet_names: &[String]) -> WorkbookShape {
    if is_template(sheet_names) {
        WorkbookShape::Template
    } else {
        WorkbookShape::Vendor
    }
}

/// 表头归一: 小写 + 仅保留字母数字
///
/// "Staff No" / "staff_no" / "STAFF-NO" 归一为 "staffno"
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// 员工号类表头别名（归一后比对）
///
/// 嗅探与宽松解析共用同一张表: 被识别为花名册/请假表的 sheet，
/// 其员工号列必然也能被解析器取到
pub const EMPLOYEE_NUMBER_ALIASES: [&str; 7] = [
    "employeenumber",
    "employeeno",
    "employeeid",
    "staffno",
    "staffnumber",
    "empno",
    "empnumber",
];

/// 假期类型类表头
const LEAVE_TYPE_KEYS: [&str; 3] = ["leavetype", "absencetype", "typeofleave"];

/// 起始日期类表头（含模板注释形态 "start_date (YYYY-MM-DD)"）
const START_DATE_KEYS: [&str; 3] = ["startdate", "leavestart", "leavefrom"];

pub fn is_employee_number_header(header: &str) -> bool {
    EMPLOYEE_NUMBER_ALIASES.contains(&normalize_header(header).as_str())
}

fn is_leave_type_header(header: &str) -> bool {
    LEAVE_TYPE_KEYS.contains(&normalize_header(header).as_str())
}

fn is_start_date_header(header: &str) -> bool {
    let normalized = normalize_header(header);
    START_DATE_KEYS
        .iter()
        .any(|key| normalized == *key || normalized.starts_with("startdate"))
}

/// Vendor 模式 sheet 归类
///
/// 优先级: 假期类型 → 员工号 → 起始日期
/// （请假表通常同时带员工号列，先看假期特征避免误判为花名册）
pub fn classify_sheet(headers: &[String]) -> Option<SheetMapping> {
    if headers.iter().any(|h| is_leave_type_header(h)) {
        return Some(SheetMapping::LeaveTable);
    }
    if headers.iter().any(|h| is_employee_number_header(h)) {
        return Some(SheetMapping::EmployeeRoster);
    }
    if headers.iter().any(|h| is_start_date_header(h)) {
        return Some(SheetMapping::LeaveTable);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_template_requires_all_sheets() {
        assert!(is_template(&names(&[
            "Employees",
            "Departments",
            "Leave",
            "UploadMetadata",
            "Engagement"
        ])));
        assert!(!is_template(&names(&[
            "Employees",
            "Departments",
            "UploadMetadata"
        ])));
        assert!(!is_template(&names(&["Sheet1"])));
    }

    #[test]
    fn test_detect_shape() {
        assert_eq!(
            detect(&names(&["Employees", "Departments", "Leave", "UploadMetadata"])),
            WorkbookShape::Template
        );
        assert_eq!(detect(&names(&["Sheet1"])), WorkbookShape::Vendor);
    }

    #[test]
    fn test_classify_vendor_roster() {
        let mapping = classify_sheet(&names(&["Staff No", "First Name", "Department"]));
        assert_eq!(mapping, Some(SheetMapping::EmployeeRoster));

        let mapping = classify_sheet(&names(&["EMPLOYEE_NO", "Name"]));
        assert_eq!(mapping, Some(SheetMapping::EmployeeRoster));
    }

    #[test]
    fn test_classify_vendor_leave_table() {
        // 同时带员工号的请假表必须归类为请假表
        let mapping = classify_sheet(&names(&["Staff No", "Leave Type", "Start Date", "End Date"]));
        assert_eq!(mapping, Some(SheetMapping::LeaveTable));

        let mapping = classify_sheet(&names(&["start_date (YYYY-MM-DD)", "end_date (YYYY-MM-DD)"]));
        assert_eq!(mapping, Some(SheetMapping::LeaveTable));
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(classify_sheet(&names(&["foo", "bar"])), None);
    }
}
