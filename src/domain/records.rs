// ==========================================
// HR 数据分析平台 - 可选 sheet 实体
// ==========================================
// 共性: 通过自然键（员工号/部门代码）回链父实体；
// 父实体查不到时引用置空，不因缺链失败整行
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 培训记录（L&D sheet）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_number: String,
    pub course_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub cost: Option<f64>,
    pub provider: Option<String>,
    pub notes: Option<String>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 医务室记录（Sickbay sheet）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SickbayRecord {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_number: String,
    pub date: Option<NaiveDate>,
    pub hours_off: Option<f64>,
    pub reason: Option<String>,
    pub approved_by_employee_number: Option<String>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 入职活动记录（Onboarding sheet）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingRecord {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_number: String,
    pub onboard_date: Option<NaiveDate>,
    pub activity: Option<String>,
    pub status: Option<String>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 离职记录（Exits sheet）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitRecord {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_number: String,
    pub exit_date: Option<NaiveDate>,
    pub reason: Option<String>,
    pub notice_period_days: Option<i64>,
    pub last_working_date: Option<NaiveDate>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 空缺岗位（Vacancies sheet）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: String,
    pub department_id: Option<String>,
    pub department_code: Option<String>,
    pub vacancy_id: Option<String>,
    pub cadre: Option<String>,
    pub status: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub filled_date: Option<NaiveDate>,
    pub cost_per_hire: Option<f64>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 敬业度指标（Engagement sheet）
///
/// upsert 键: (period, metric_name, department_code)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementMetric {
    pub id: String,
    /// 期间键（YYYY-MM）；行内缺省时回落到上传元数据期间
    pub period: String,
    pub department_code: Option<String>,
    pub metric_name: String,
    pub metric_value: Option<f64>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 法定合规项（StatutoryCompliance sheet，只追加）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutoryComplianceItem {
    pub id: String,
    pub item: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}
