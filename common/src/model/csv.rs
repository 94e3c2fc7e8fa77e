use crate::model::generation::RowData;
use serde::{Deserialize, Serialize};

/// Value type guessed for a dataset column from its first data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Currency,
    Percent,
    Date,
    Email,
}

/// Inferred schema of a single CSV column.
///
/// Returned with an uploaded dataset so the client can review the headers
/// and a concrete example value before mapping tags onto them.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCheck {
    /// The header title, trimmed and unquoted.
    pub title: String,
    pub column_type: ColumnType,
    /// The value of this column in the first data row, if any.
    pub first_row: Option<String>,
}

/// A parsed dataset upload.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// MD5 of the uploaded bytes.
    pub md5: String,
    pub headers: Vec<String>,
    pub columns: Vec<ColumnCheck>,
    pub rows: Vec<RowData>,
}
