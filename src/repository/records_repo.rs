// ==========================================
// HR 数据分析平台 - 可选 sheet Repository
// ==========================================
// 职责: 培训/医务/入职/离职/空缺/敬业度/合规的事务内写入
// 敬业度按 (period, metric_name, department_code) 冲突合并，
// 其余均为追加写
// ==========================================

use crate::domain::records::{
    EngagementMetric, ExitRecord, OnboardingRecord, SickbayRecord, StatutoryComplianceItem,
    TrainingRecord, Vacancy,
};
use crate::importer::error::IngestResult;
use rusqlite::{params, OptionalExtension, Transaction};

pub fn insert_training(tx: &Transaction, record: &TrainingRecord) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO training_records (
            id, employee_id, employee_number, course_name, start_date, end_date,
            status, cost, provider, notes, source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            record.id,
            record.employee_id,
            record.employee_number,
            record.course_name,
            record.start_date.map(|d| d.to_string()),
            record.end_date.map(|d| d.to_string()),
            record.status,
            record.cost,
            record.provider,
            record.notes,
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_sickbay(tx: &Transaction, record: &SickbayRecord) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO sickbay_records (
            id, employee_id, employee_number, date, hours_off, reason,
            approved_by_employee_number, source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            record.id,
            record.employee_id,
            record.employee_number,
            record.date.map(|d| d.to_string()),
            record.hours_off,
            record.reason,
            record.approved_by_employee_number,
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_onboarding(tx: &Transaction, record: &OnboardingRecord) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO onboarding_records (
            id, employee_id, employee_number, onboard_date, activity, status,
            source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            record.id,
            record.employee_id,
            record.employee_number,
            record.onboard_date.map(|d| d.to_string()),
            record.activity,
            record.status,
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_exit(tx: &Transaction, record: &ExitRecord) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO exit_records (
            id, employee_id, employee_number, exit_date, reason,
            notice_period_days, last_working_date, source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            record.id,
            record.employee_id,
            record.employee_number,
            record.exit_date.map(|d| d.to_string()),
            record.reason,
            record.notice_period_days,
            record.last_working_date.map(|d| d.to_string()),
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_vacancy(tx: &Transaction, record: &Vacancy) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO vacancies (
            id, department_id, department_code, vacancy_id, cadre, status,
            posted_date, filled_date, cost_per_hire, source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            record.id,
            record.department_id,
            record.department_code,
            record.vacancy_id,
            record.cadre,
            record.status,
            record.posted_date.map(|d| d.to_string()),
            record.filled_date.map(|d| d.to_string()),
            record.cost_per_hire,
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// 敬业度指标 upsert
///
/// 键: (period, metric_name, department_code)；department_code 可为 NULL，
/// 用 IS 比较避免 NULL 键重复插入
pub fn upsert_engagement(tx: &Transaction, record: &EngagementMetric) -> IngestResult<()> {
    let existing: Option<String> = tx
        .query_row(
            r#"
            SELECT id FROM engagement_metrics
            WHERE period = ?1 AND metric_name = ?2 AND department_code IS ?3
            "#,
            params![record.period, record.metric_name, record.department_code],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(id) => {
            tx.execute(
                r#"
                UPDATE engagement_metrics
                SET metric_value = ?2, source_file = ?3
                WHERE id = ?1
                "#,
                params![id, record.metric_value, record.source_file],
            )?;
        }
        None => {
            tx.execute(
                r#"
                INSERT INTO engagement_metrics (
                    id, period, department_code, metric_name, metric_value,
                    source_file, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    record.id,
                    record.period,
                    record.department_code,
                    record.metric_name,
                    record.metric_value,
                    record.source_file,
                    record.created_at.to_rfc3339(),
                ],
            )?;
        }
    }
    Ok(())
}

/// 法定合规项: 纯追加，无去重（合规日志口径）
pub fn insert_statutory(tx: &Transaction, record: &StatutoryComplianceItem) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO statutory_compliance (
            id, item, due_date, status, notes, source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
        params![
            record.id,
            record.item,
            record.due_date.map(|d| d.to_string()),
            record.status,
            record.notes,
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// 通用行数统计（测试/校验用）
pub fn count_table_rows(conn: &rusqlite::Connection, table: &str) -> IngestResult<i64> {
    // 表名来自固定集合，调用方不得传入外部输入
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(count)
}
