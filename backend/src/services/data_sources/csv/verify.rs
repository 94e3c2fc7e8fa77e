//! CSV parsing and column inspection for uploaded datasets.
//!
//! The delimiter is guessed from the header line, cells are trimmed and
//! unquoted, and each column gets a type guess from its first data row so the
//! client can sanity-check the mapping before generating.

use common::model::csv::{ColumnCheck, ColumnType};
use common::model::generation::{CellValue, RowData};
use rayon::prelude::*;
use std::collections::HashSet;

use crate::engines::mapping::semantics::{looks_like_currency, looks_like_date, looks_like_percent};
use crate::error::{EngineError, Result};

const DELIMITERS: [char; 4] = [',', ';', '\t', '|'];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The candidate delimiter occurring most often in `header_line`, `,` when
/// none occurs.
pub fn detect_delimiter(header_line: &str) -> char {
    DELIMITERS
        .iter()
        .copied()
        .filter(|d| header_line.contains(*d))
        .max_by_key(|d| header_line.matches(*d).count())
        .unwrap_or(',')
}

/// Trims, strips one level of single or double quotes and turns non-breaking
/// spaces into plain ones.
pub fn normalize_cell(cell: &str) -> String {
    let s = cell.trim();
    let s = s
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| s.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .unwrap_or(s);
    s.replace('\u{00A0}', " ").trim().to_string()
}

fn looks_like_number(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse::<f64>().is_ok() || compact.replacen(',', ".", 1).parse::<f64>().is_ok()
}

pub fn infer_column_type(value: &str) -> ColumnType {
    let value = value.trim();
    if value.contains('@') && value.contains('.') {
        ColumnType::Email
    } else if looks_like_currency(value) {
        ColumnType::Currency
    } else if looks_like_percent(value) {
        ColumnType::Percent
    } else if looks_like_date(value) {
        ColumnType::Date
    } else if looks_like_number(value) {
        ColumnType::Number
    } else {
        ColumnType::Text
    }
}

/// One [`ColumnCheck`] per header, typed from `first_row`. Columns with no
/// value in the first row are text.
pub fn infer_column_checks(headers: &[String], first_row: Option<&RowData>) -> Vec<ColumnCheck> {
    headers
        .iter()
        .map(|title| {
            let value = first_row
                .and_then(|row| row.get(title))
                .filter(|cell| **cell != CellValue::Null)
                .map(|cell| cell.to_string());
            ColumnCheck {
                title: title.clone(),
                column_type: value
                    .as_deref()
                    .map(infer_column_type)
                    .unwrap_or(ColumnType::Text),
                first_row: value,
            }
        })
        .collect()
}

fn validate_headers(headers: &[String]) -> Result<()> {
    if headers.is_empty() {
        return Err(EngineError::InvalidInput("CSV has no header row".to_string()));
    }
    let mut seen = HashSet::new();
    for (i, header) in headers.iter().enumerate() {
        if header.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "CSV header cell {} is empty",
                i + 1
            )));
        }
        if !seen.insert(header.as_str()) {
            return Err(EngineError::InvalidInput(format!(
                "CSV header '{}' appears twice",
                header
            )));
        }
    }
    Ok(())
}

/// Headers, column checks and rows of a CSV upload. Empty cells and cells
/// missing from short records are null.
pub fn parse_dataset(bytes: &[u8]) -> Result<(Vec<String>, Vec<ColumnCheck>, Vec<RowData>)> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(body)
        .map_err(|_| EngineError::InvalidInput("CSV is not valid UTF-8".to_string()))?;
    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EngineError::InvalidInput(format!("CSV header: {}", e)))?
        .iter()
        .map(normalize_cell)
        .collect();
    validate_headers(&headers)?;

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| EngineError::InvalidInput(format!("CSV row: {}", e)))?;

    let rows: Vec<RowData> = records
        .par_iter()
        .filter(|record| record.iter().any(|cell| !cell.trim().is_empty()))
        .map(|record| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let value = record
                        .get(i)
                        .map(normalize_cell)
                        .filter(|v| !v.is_empty())
                        .map_or(CellValue::Null, CellValue::Text);
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();

    let columns = infer_column_checks(&headers, rows.first());
    Ok((headers, columns, rows))
}
