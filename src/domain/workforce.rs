// ==========================================
// HR 数据分析平台 - 组织与员工实体
// ==========================================
// Department: 按 department_code 自然键 upsert
// Employee: 按 employee_number 自然键 upsert（后写覆盖）
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 部门
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    /// 自然键，同一上传内唯一
    pub department_code: String,
    pub department_name: Option<String>,
    pub parent_department_code: Option<String>,
    pub head_employee_number: Option<String>,
    /// 来源文件名（数据溯源）
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 员工
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    /// 自然键，必填且非空
    pub employee_number: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// 部门引用（同一遍内由部门 sheet 填充的映射解析；解析失败为 None）
    pub department_id: Option<String>,
    /// 冗余的部门代码（映射未命中时仍保留原始代码）
    pub department_code: Option<String>,
    pub job_title: Option<String>,
    pub grade: Option<String>,
    /// 经理员工号（允许引用尚未出现的员工，查询时解析）
    pub manager_employee_number: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub location: Option<String>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
