// ==========================================
// HR 数据分析平台 - 请假记录 Repository
// ==========================================
// 职责: 请假行的事务内插入/合并与区间重叠查询
// 约束: 重叠判定必须与插入同处一个业务事务（检测+决策原子化）
// ==========================================

use crate::domain::leave::LeaveRecord;
use crate::importer::error::IngestResult;
use rusqlite::{params, OptionalExtension, Transaction};

/// 查询同员工与 [start, end] 重叠的既有请假行
///
/// 重叠判定: NOT (new.end < existing.start OR new.start > existing.end)
/// 日期为 ISO 文本，按字典序比较即为日期序
pub fn find_overlapping(
    tx: &Transaction,
    employee_number: &str,
    start: &str,
    end: &str,
) -> IngestResult<Option<String>> {
    let id = tx
        .query_row(
            r#"
            SELECT id FROM leave_records
            WHERE employee_number = ?1
              AND start_date <= ?3
              AND end_date >= ?2
            LIMIT 1
            "#,
            params![employee_number, start, end],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// 查询 (员工号, 起始, 结束) 完全一致的既有行（合并键）
pub fn find_exact(
    tx: &Transaction,
    employee_number: &str,
    start: &str,
    end: &str,
) -> IngestResult<Option<String>> {
    let id = tx
        .query_row(
            r#"
            SELECT id FROM leave_records
            WHERE employee_number = ?1 AND start_date = ?2 AND end_date = ?3
            "#,
            params![employee_number, start, end],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// 插入请假行
pub fn insert_leave(tx: &Transaction, record: &LeaveRecord) -> IngestResult<()> {
    tx.execute(
        r#"
        INSERT INTO leave_records (
            id, employee_id, employee_number, leave_type, start_date, end_date,
            working_days, status, reason, source_reference, source_file, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        params![
            record.id,
            record.employee_id,
            record.employee_number,
            record.leave_type,
            record.start_date.to_string(),
            record.end_date.to_string(),
            record.working_days,
            record.status,
            record.reason,
            record.source_reference,
            record.source_file,
            record.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// 按合并键覆盖可变字段（不产生重复行）
pub fn merge_leave(tx: &Transaction, existing_id: &str, record: &LeaveRecord) -> IngestResult<()> {
    tx.execute(
        r#"
        UPDATE leave_records
        SET employee_id = COALESCE(?2, employee_id),
            leave_type = ?3,
            working_days = ?4,
            status = ?5,
            reason = ?6,
            source_reference = ?7,
            source_file = ?8
        WHERE id = ?1
        "#,
        params![
            existing_id,
            record.employee_id,
            record.leave_type,
            record.working_days,
            record.status,
            record.reason,
            record.source_reference,
            record.source_file,
        ],
    )?;
    Ok(())
}
