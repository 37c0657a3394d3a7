// ==========================================
// HR 数据分析平台 - 敬业度指标解析器
// ==========================================
// upsert 键: (period, metric_name, department_code)
// 行内缺 period 时回落到上传元数据的报告期间（YYYY-MM）
// ==========================================

use crate::domain::records::EngagementMetric;
use crate::domain::types::RowErrorKind;
use crate::domain::upload::RowError;
use crate::importer::contract::SHEET_ENGAGEMENT;
use crate::importer::workbook::RowRecord;
use crate::repository::records_repo;
use rusqlite::Transaction;

use super::{db_row_error, EntityResolver, RowOutcome, RowView, UploadContext};

pub struct EngagementResolver;

impl EntityResolver for EngagementResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, SHEET_ENGAGEMENT);

        let period = view
            .text(&["period (YYYY-MM)", "period"])
            .or_else(|| ctx.period.as_ref().map(|p| p.month_key()))
            .ok_or_else(|| {
                view.error(
                    Some("period (YYYY-MM)"),
                    RowErrorKind::RowFailed,
                    "missing period and no reporting period to fall back to",
                )
            })?;

        let metric_name = view.text(&["metric_name"]).ok_or_else(|| {
            view.error(
                Some("metric_name"),
                RowErrorKind::RowFailed,
                "missing metric_name",
            )
        })?;

        let record = EngagementMetric {
            id: uuid::Uuid::new_v4().to_string(),
            period,
            department_code: view.text(&["department_code"]),
            metric_name,
            metric_value: view.number(&["metric_value"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::upsert_engagement(tx, &record)
            .map_err(|e| db_row_error(SHEET_ENGAGEMENT, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}
