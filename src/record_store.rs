//! Spreadsheet persistence for flat records.
//!
//! A sheet is read as a header row followed by data rows; each data row becomes
//! a [`Record`] keyed by the header labels. Writing is the inverse and always
//! replaces the destination workbook.

use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};
use umya_spreadsheet::Cell;

/// One spreadsheet row, keyed by column header in column order.
pub type Record = IndexMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// No cell at all. Loaded records never contain it: blank cells in a row
    /// that has data read back as empty text.
    Empty,
}

impl FieldValue {
    /// Textual view of the cell. Whole numbers render without a fraction so
    /// that an id typed as `7` in a spreadsheet reads back as `"7"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text.clone()),
            FieldValue::Number(number) if number.fract() == 0.0 && number.is_finite() => {
                Some(format!("{}", *number as i64))
            }
            FieldValue::Number(number) => Some(number.to_string()),
            FieldValue::Empty => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Number(_) => false,
            FieldValue::Empty => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(text) => text.trim().parse().ok(),
            FieldValue::Empty => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(&text),
            None => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("failed to read workbook {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("failed to write workbook {path}: {message}")]
    Write { path: PathBuf, message: String },
    #[error("sheet '{sheet}' not found in {path}")]
    MissingSheet { path: PathBuf, sheet: String },
    #[error("record is missing field '{0}'")]
    MissingField(String),
    #[error("field '{field}' has invalid value '{value}'")]
    InvalidField { field: String, value: String },
}

/// Reads `sheet_name` from the workbook at `path`.
///
/// A missing file yields no records. A sheet without any rows also yields no
/// records; blank rows are skipped. Blank cells in other rows load as empty
/// text, so whatever [`save`] wrote reads back unchanged.
#[instrument]
pub fn load(path: &Path, sheet_name: &str) -> Result<Vec<Record>, RecordStoreError> {
    let read_error = |message: String| RecordStoreError::Read {
        path: path.to_path_buf(),
        message,
    };

    if !path.try_exists().map_err(|e| read_error(e.to_string()))? {
        debug!("workbook not found, starting empty");
        return Ok(Vec::new());
    }

    let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| read_error(e.to_string()))?;
    let sheet = book
        .get_sheet_by_name(sheet_name)
        .ok_or_else(|| RecordStoreError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet_name.to_string(),
        })?;

    let (max_col, max_row) = sheet.get_highest_column_and_row();
    if max_row == 0 || max_col == 0 {
        return Ok(Vec::new());
    }

    let headers: Vec<String> = (1..=max_col)
        .map(|col| {
            sheet
                .get_cell((col, 1))
                .map(|cell| cell.get_value().to_string())
                .unwrap_or_default()
        })
        .collect();

    let mut records = Vec::new();
    for row in 2..=max_row {
        let values: Vec<FieldValue> = (1..=max_col)
            .map(|col| sheet.get_cell((col, row)).map(cell_to_value).unwrap_or(FieldValue::Empty))
            .collect();
        if values.iter().all(|value| *value == FieldValue::Empty) {
            continue;
        }
        let values = values.into_iter().map(|value| match value {
            FieldValue::Empty => FieldValue::Text(String::new()),
            other => other,
        });
        records.push(headers.iter().cloned().zip(values).collect());
    }

    debug!(rows = records.len(), "workbook loaded");
    Ok(records)
}

/// Writes `records` as the only sheet of a fresh workbook at `path`,
/// overwriting whatever was there. Column order follows the first record.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn save(path: &Path, sheet_name: &str, records: &[Record]) -> Result<(), RecordStoreError> {
    let write_error = |message: String| RecordStoreError::Write {
        path: path.to_path_buf(),
        message,
    };

    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(sheet_name)
        .map_err(|e| write_error(e.to_string()))?;

    if let Some(first) = records.first() {
        let headers: Vec<&String> = first.keys().collect();
        for (col, header) in (1u32..).zip(&headers) {
            sheet.get_cell_mut((col, 1)).set_value_string(header.as_str());
        }

        for (row, record) in (2u32..).zip(records) {
            for (col, header) in (1u32..).zip(&headers) {
                let cell = sheet.get_cell_mut((col, row));
                match record.get(header.as_str()) {
                    Some(FieldValue::Text(text)) => {
                        cell.set_value_string(text.as_str());
                    }
                    Some(FieldValue::Number(number)) => {
                        cell.set_value_number(*number);
                    }
                    Some(FieldValue::Empty) | None => {}
                }
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, path).map_err(|e| write_error(e.to_string()))
}

fn cell_to_value(cell: &Cell) -> FieldValue {
    if let Some(number) = cell.get_value_number() {
        return FieldValue::Number(number);
    }
    let raw = cell.get_value();
    if raw.is_empty() {
        FieldValue::Empty
    } else {
        FieldValue::Text(raw.to_string())
    }
}

/// Looks up `field` as text, failing only when the column is absent. Blank
/// text is returned as is.
pub fn required_text(record: &Record, field: &str) -> Result<String, RecordStoreError> {
    record
        .get(field)
        .and_then(FieldValue::as_text)
        .ok_or_else(|| RecordStoreError::MissingField(field.to_string()))
}

/// Looks up `field` as a number, failing when it is absent or not numeric.
pub fn required_number(record: &Record, field: &str) -> Result<f64, RecordStoreError> {
    let value = record
        .get(field)
        .filter(|value| !value.is_blank())
        .ok_or_else(|| RecordStoreError::MissingField(field.to_string()))?;
    value.as_number().ok_or_else(|| RecordStoreError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    })
}
