// ==========================================
// HR 数据分析平台 - 工作簿抽象与文件解析
// ==========================================
// 核心只消费解析后的表格结构（Workbook/Sheet/RowRecord）；
// calamine / csv 是该结构的两个装载前端。
// 支持: Excel (.xlsx/.xls) / CSV (.csv，视为单 sheet 工作簿)
// ==========================================

use crate::importer::error::{IngestError, IngestResult};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 单元格值
///
/// Excel 日期单元格以序列号（Number）形态进入，
/// 由日期工具统一归一；Date 变体用于已解析的原生日期。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDateTime),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 文本视图（非文本单元格转为显示字符串；空单元格为 None）
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Date(dt) => Some(dt.date().to_string()),
            Cell::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        }
    }

    /// 数值视图（数字单元格或可解析为数字的文本）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// 整数格式化时去掉小数点（Excel 把 "3" 读为 3.0）
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// 一行记录（表头 → 单元格）
///
/// row_number 为 sheet 内 1 起始行号，表头占第 1 行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowRecord {
    pub row_number: usize,
    pub cells: HashMap<String, Cell>,
}

/// 单个 sheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<RowRecord>,
}

/// 解析后的工作簿句柄
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

// ==========================================
// Excel 装载（calamine）
// ==========================================
pub fn load_excel_workbook(file_path: &Path) -> IngestResult<Workbook> {
    if !file_path.exists() {
        return Err(IngestError::FileNotFound(file_path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(file_path)
        .map_err(|e| IngestError::ExcelParseError(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err(IngestError::ExcelParseError("Excel 文件无工作表".to_string()));
    }

    let mut sheets = Vec::new();
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| IngestError::ExcelParseError(e.to_string()))?;

        let mut rows_iter = range.rows();

        // 表头（第一行）；空 sheet 保留为无表头空 sheet
        let headers: Vec<String> = match rows_iter.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            None => Vec::new(),
        };

        let mut rows = Vec::new();
        for (idx, data_row) in rows_iter.enumerate() {
            let mut cells = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if header.is_empty() {
                        continue;
                    }
                    cells.insert(header.clone(), convert_cell(cell));
                }
            }

            // 跳过完全空白的行（行号仍按物理位置计）
            if cells.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RowRecord {
                row_number: idx + 2,
                cells,
            });
        }

        sheets.push(Sheet {
            name: sheet_name,
            headers,
            rows,
        });
    }

    Ok(Workbook { sheets })
}

/// calamine 单元格 → Cell
///
/// 日期格式单元格转为原生日期；无法转换（如 duration 格式）
/// 保留序列号形态，由日期工具按 epoch 1899-12-30 归一
fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => match dt.as_datetime() {
            Some(naive) => Cell::Date(naive),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

// ==========================================
// CSV 装载（单 sheet 工作簿，sheet 名取文件主名）
// ==========================================
pub fn load_csv_workbook(file_path: &Path) -> IngestResult<Workbook> {
    if !file_path.exists() {
        return Err(IngestError::FileNotFound(file_path.display().to_string()));
    }

    let sheet_name = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Sheet1")
        .to_string();

    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let mut cells = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                if header.is_empty() {
                    continue;
                }
                cells.insert(header.clone(), Cell::Text(value.to_string()));
            }
        }

        if cells.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(RowRecord {
            row_number: idx + 2,
            cells,
        });
    }

    Ok(Workbook {
        sheets: vec![Sheet {
            name: sheet_name,
            headers,
            rows,
        }],
    })
}

// ==========================================
// 通用装载（根据扩展名自动选择）
// ==========================================
pub fn load_workbook<P: AsRef<Path>>(file_path: P) -> IngestResult<Workbook> {
    let path = file_path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xls" => load_excel_workbook(path),
        "csv" => load_csv_workbook(path),
        _ => Err(IngestError::UnsupportedFormat(ext)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_csv_workbook_basic() {
        let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(temp_file, "Staff No,First Name,Department").unwrap();
        writeln!(temp_file, "E001,Alice,OPS").unwrap();
        writeln!(temp_file, "E002,Bob,HR").unwrap();

        let workbook = load_csv_workbook(temp_file.path()).unwrap();
        assert_eq!(workbook.sheets.len(), 1);

        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.headers, vec!["Staff No", "First Name", "Department"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].row_number, 2);
        assert_eq!(
            sheet.rows[0].cells.get("Staff No"),
            Some(&Cell::Text("E001".to_string()))
        );
    }

    #[test]
    fn test_csv_workbook_skips_blank_rows() {
        let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(temp_file, "employee_number,leave_type").unwrap();
        writeln!(temp_file, "E001,Annual").unwrap();
        writeln!(temp_file, ",").unwrap(); // 空行
        writeln!(temp_file, "E002,Sick").unwrap();

        let workbook = load_csv_workbook(temp_file.path()).unwrap();
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.rows.len(), 2);
        // 空行被跳过但行号保持物理位置
        assert_eq!(sheet.rows[1].row_number, 4);
    }

    #[test]
    fn test_load_workbook_unsupported_extension() {
        let result = load_workbook(Path::new("report.pdf"));
        assert!(matches!(result, Err(IngestError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_convert_cell_native_dates() {
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        // 45901 = 2025-09-01（epoch 1899-12-30）
        let date = convert_cell(&Data::DateTime(ExcelDateTime::new(
            45901.0,
            ExcelDateTimeType::DateTime,
            false,
        )));
        match date {
            Cell::Date(dt) => assert_eq!(dt.date().to_string(), "2025-09-01"),
            other => panic!("expected date cell, got {:?}", other),
        }
        assert_eq!(date.as_text(), Some("2025-09-01".to_string()));

        // duration 格式保留序列号形态
        let duration = convert_cell(&Data::DateTime(ExcelDateTime::new(
            1.5,
            ExcelDateTimeType::TimeDelta,
            false,
        )));
        assert_eq!(duration, Cell::Number(1.5));
    }

    #[test]
    fn test_cell_views() {
        assert_eq!(Cell::Number(3.0).as_text(), Some("3".to_string()));
        assert_eq!(Cell::Text(" 2.5 ".to_string()).as_f64(), Some(2.5));
        assert_eq!(Cell::Text("  ".to_string()).as_text(), None);
        assert!(Cell::Empty.is_empty());
    }
}
