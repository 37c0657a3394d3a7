// ==========================================
// HR 数据分析平台 - 上传台账与错误落地
// ==========================================
// 职责:
// - UploadJob 台账: 创建（PROCESSING）+ 恰好一次终态更新
// - UploadError 落地: 追加写
// 关键: 台账与错误写入不进入业务事务 ——
// 行级错误在业务事务回滚后仍完整保留（可排查性优先）
// ==========================================

use crate::domain::upload::{ReportingPeriod, RowError, UploadError, UploadJob};
use crate::domain::types::UploadStatus;
use crate::importer::error::{IngestError, IngestResult};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 上传任务台账（独立于业务事务的连接）
pub struct UploadLedger {
    conn: Arc<Mutex<Connection>>,
}

impl UploadLedger {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> IngestResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| IngestError::InternalError(format!("锁获取失败: {}", e)))
    }

    /// 创建任务记录（状态 PROCESSING）
    pub fn create_job(&self, job: &UploadJob) -> IngestResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO upload_jobs (
                id, filename, uploader, status, processed_rows, failed_rows,
                period_start, period_end, error_summary, created_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                job.id,
                job.filename,
                job.uploader,
                job.status.as_str(),
                job.processed_rows,
                job.failed_rows,
                job.period_start.map(|d| d.to_string()),
                job.period_end.map(|d| d.to_string()),
                job.error_summary,
                job.created_at.to_rfc3339(),
                job.completed_at.map(|dt| dt.to_rfc3339()),
            ],
        )?;
        Ok(())
    }

    /// 终态更新: COMPLETED（计数与期间）
    pub fn complete_job(
        &self,
        upload_id: &str,
        processed_rows: i64,
        failed_rows: i64,
        period: Option<ReportingPeriod>,
    ) -> IngestResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            UPDATE upload_jobs
            SET status = ?2,
                processed_rows = ?3,
                failed_rows = ?4,
                period_start = ?5,
                period_end = ?6,
                completed_at = ?7
            WHERE id = ?1
            "#,
            params![
                upload_id,
                UploadStatus::Completed.as_str(),
                processed_rows,
                failed_rows,
                period.map(|p| p.start.to_string()),
                period.map(|p| p.end.to_string()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 终态更新: FAILED（错误摘要）
    pub fn fail_job(&self, upload_id: &str, error_summary: &str) -> IngestResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            UPDATE upload_jobs
            SET status = ?2, error_summary = ?3, completed_at = ?4
            WHERE id = ?1
            "#,
            params![
                upload_id,
                UploadStatus::Failed.as_str(),
                error_summary,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// 批量落地行级错误（业务事务终结后调用）
    pub fn insert_errors(&self, upload_id: &str, errors: &[RowError]) -> IngestResult<usize> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction()?;

        let mut stmt = tx.prepare(
            r#"
            INSERT INTO upload_errors (
                id, upload_id, sheet, row_number, column_name, message, sample, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )?;

        let mut count = 0;
        for error in errors {
            stmt.execute(params![
                Uuid::new_v4().to_string(),
                upload_id,
                error.sheet,
                error.row as i64,
                error.column,
                error.message,
                error.sample.clone().unwrap_or_else(|| "{}".to_string()),
                Utc::now().to_rfc3339(),
            ])?;
            count += 1;
        }

        // 显式释放 stmt 的借用，以便提交事务
        drop(stmt);

        tx.commit()?;
        Ok(count)
    }

    /// 查询任务记录（状态查询接口）
    pub fn get_job(&self, upload_id: &str) -> IngestResult<Option<UploadJob>> {
        let conn = self.lock()?;
        let job = conn
            .query_row(
                r#"
                SELECT id, filename, uploader, status, processed_rows, failed_rows,
                       period_start, period_end, error_summary, created_at, completed_at
                FROM upload_jobs
                WHERE id = ?1
                "#,
                params![upload_id],
                |row| {
                    let status_raw: String = row.get(3)?;
                    let period_start: Option<String> = row.get(6)?;
                    let period_end: Option<String> = row.get(7)?;
                    let created_at: String = row.get(9)?;
                    let completed_at: Option<String> = row.get(10)?;
                    Ok(UploadJob {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        uploader: row.get(2)?,
                        status: UploadStatus::parse(&status_raw)
                            .unwrap_or(UploadStatus::Failed),
                        processed_rows: row.get(4)?,
                        failed_rows: row.get(5)?,
                        period_start: period_start.and_then(|s| parse_day(&s)),
                        period_end: period_end.and_then(|s| parse_day(&s)),
                        error_summary: row.get(8)?,
                        created_at: parse_timestamp(&created_at),
                        completed_at: completed_at.map(|s| parse_timestamp(&s)),
                    })
                },
            )
            .optional()?;
        Ok(job)
    }

    /// 查询某次上传的全部行级错误（按 sheet/行号排序）
    pub fn list_errors(&self, upload_id: &str) -> IngestResult<Vec<UploadError>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, upload_id, sheet, row_number, column_name, message, sample, created_at
            FROM upload_errors
            WHERE upload_id = ?1
            ORDER BY sheet, row_number
            "#,
        )?;

        let errors = stmt
            .query_map(params![upload_id], |row| {
                let created_at: String = row.get(7)?;
                Ok(UploadError {
                    id: row.get(0)?,
                    upload_id: row.get(1)?,
                    sheet: row.get(2)?,
                    row: row.get::<_, i64>(3)? as usize,
                    column: row.get(4)?,
                    message: row.get(5)?,
                    sample: row.get(6)?,
                    created_at: parse_timestamp(&created_at),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(errors)
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_timestamp(raw: &str) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
