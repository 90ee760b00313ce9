//! Master table domain models.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::naming::is_dated_column;
use crate::constants::SHARE_NAME_COLUMN;
use crate::errors::MergeError;
use crate::workbook::parse_decimal_text;

/// A value in the master table.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(Decimal),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the cell; numeric text written by other tools counts.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(d) => Some(*d),
            CellValue::Text(s) => parse_decimal_text(s),
            CellValue::Empty => None,
        }
    }

    /// Key form of the cell, used for the security name column.
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            CellValue::Number(d) => Some(d.normalize().to_string()),
            CellValue::Empty => None,
        }
    }

    /// JSON form: null, string, or a number (integral values as integers).
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Empty => Value::Null,
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Number(d) => {
                if d.fract().is_zero() {
                    if let Some(i) = d.to_i64() {
                        return Value::Number(i.into());
                    }
                }
                d.to_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
    }
}

impl From<Option<Decimal>> for CellValue {
    fn from(value: Option<Decimal>) -> Self {
        value.map(CellValue::Number).unwrap_or(CellValue::Empty)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// One master row as an ordered column-name → value mapping.
pub type MasterRecord = Map<String, Value>;

/// Wide table keyed by security name with one column per ingested snapshot.
///
/// Rows always have exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct MasterTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl MasterTable {
    /// Table holding only the key column, used before the first upload.
    pub fn empty() -> Self {
        Self {
            columns: vec![SHARE_NAME_COLUMN.to_string()],
            rows: Vec::new(),
        }
    }

    /// Builds a table from raw parts, rejecting rows whose width differs
    /// from the header.
    pub fn from_parts(
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> std::result::Result<Self, MergeError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(MergeError::RaggedRow {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn key_index(&self) -> Option<usize> {
        self.column_index(SHARE_NAME_COLUMN)
    }

    /// Indices of the dated shares-held columns, in append order.
    pub fn dated_column_indices(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, name)| is_dated_column(name))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Security names in row order; rows without a key are skipped.
    pub fn security_names(&self) -> Vec<String> {
        let Some(key) = self.key_index() else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row[key].as_key())
            .collect()
    }

    /// Cell for a security in a named column.
    pub fn value(&self, security_name: &str, column: &str) -> Option<&CellValue> {
        let key = self.key_index()?;
        let col = self.column_index(column)?;
        self.rows
            .iter()
            .find(|row| row[key].as_key().as_deref() == Some(security_name))
            .map(|row| &row[col])
    }

    /// Removes a column by name, returning whether it existed.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Appends a column; `values` must hold one cell per row.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> std::result::Result<(), MergeError> {
        let name = name.into();
        if self.column_index(&name).is_some() {
            return Err(MergeError::ColumnExists(name));
        }
        if values.len() != self.rows.len() {
            return Err(MergeError::RaggedRow {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Rows as ordered column-name → JSON value mappings.
    pub fn to_records(&self) -> Vec<MasterRecord> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| (name.clone(), cell.to_json()))
                    .collect()
            })
            .collect()
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<CellValue>>) {
        (self.columns, self.rows)
    }
}

impl Default for MasterTable {
    fn default() -> Self {
        Self::empty()
    }
}
