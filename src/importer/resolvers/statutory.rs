// ==========================================
// HR 数据分析平台 - 法定合规项解析器
// ==========================================
// 只追加，无自然键；全部字段可空
// ==========================================

use crate::domain::records::StatutoryComplianceItem;
use crate::domain::upload::RowError;
use crate::importer::contract::SHEET_STATUTORY;
use crate::importer::workbook::RowRecord;
use crate::repository::records_repo;
use rusqlite::Transaction;

use super::{db_row_error, EntityResolver, RowOutcome, RowView, UploadContext};

pub struct StatutoryResolver;

impl EntityResolver for StatutoryResolver {
    fn resolve(
        &self,
        tx: &Transaction,
        ctx: &mut UploadContext,
        row: &RowRecord,
    ) -> Result<RowOutcome, RowError> {
        let view = RowView::new(row, SHEET_STATUTORY);

        let record = StatutoryComplianceItem {
            id: uuid::Uuid::new_v4().to_string(),
            item: view.text(&["item"]),
            due_date: view.date(&["due_date"]),
            status: view.text(&["status"]),
            notes: view.text(&["notes"]),
            source_file: Some(ctx.source_file.clone()),
            created_at: chrono::Utc::now(),
        };

        records_repo::insert_statutory(tx, &record)
            .map_err(|e| db_row_error(SHEET_STATUTORY, row.row_number, e))?;
        Ok(RowOutcome::Applied)
    }
}
