// ==========================================
// HR 数据分析平台 - 请假记录实体
// ==========================================
// 不变式: 同一员工的请假区间两两不重叠
// - 区间重叠的新行按重复跳过（信息记录，不计失败）
// - (员工, 起始, 结束) 三元组完全相同时按字段合并
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 请假记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRecord {
    pub id: String,
    pub employee_id: Option<String>,
    pub employee_number: String,
    /// 大小写归一后的假期类型（如 "Annual"）
    pub leave_type: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// 显式提供的非零值优先，否则按工作日日历计算
    pub working_days: f64,
    pub status: Option<String>,
    pub reason: Option<String>,
    pub source_reference: Option<String>,
    pub source_file: Option<String>,
    pub created_at: DateTime<Utc>,
}
