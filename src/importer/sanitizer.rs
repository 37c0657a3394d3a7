// ==========================================
// HR 数据分析平台 - 行清洗器
// ==========================================
// 职责: 表头键与文本单元格统一 TRIM
// 纯函数、全函数 —— 永不失败
// ==========================================

use crate::importer::workbook::{Cell, RowRecord};
use std::collections::HashMap;

/// 清洗单行: 键去空白，文本值去空白，非文本值原样透传
pub fn sanitize_row(row: &RowRecord) -> RowRecord {
    let mut cells = HashMap::with_capacity(row.cells.len());
    for (key, value) in &row.cells {
        let cleaned = match value {
            Cell::Text(s) => Cell::Text(s.trim().to_string()),
            other => other.clone(),
        };
        cells.insert(key.trim().to_string(), cleaned);
    }
    RowRecord {
        row_number: row.row_number,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_trims_keys_and_text_values() {
        let mut cells = HashMap::new();
        cells.insert(" employee_number ".to_string(), Cell::Text("  E001 ".to_string()));
        cells.insert("working_days".to_string(), Cell::Number(3.0));
        let row = RowRecord {
            row_number: 2,
            cells,
        };

        let cleaned = sanitize_row(&row);
        assert_eq!(
            cleaned.cells.get("employee_number"),
            Some(&Cell::Text("E001".to_string()))
        );
        // 非文本值透传
        assert_eq!(cleaned.cells.get("working_days"), Some(&Cell::Number(3.0)));
        assert_eq!(cleaned.row_number, 2);
    }
}
