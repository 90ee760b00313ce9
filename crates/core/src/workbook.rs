//! In-memory spreadsheet model handed over by the spreadsheet reader.
//!
//! Positions are absolute: row 0 / column 0 is the top-left cell of the
//! worksheet even when the leading rows are blank.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl RawCell {
    /// Empty cells and whitespace-only text count as missing values.
    pub fn is_missing(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(n) => n.is_nan(),
            RawCell::Bool(_) => false,
        }
    }

    /// Trimmed text form of the cell, `None` for missing values.
    ///
    /// Whole numbers render without a fractional part so numeric security
    /// identifiers keep their natural spelling.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawCell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            RawCell::Number(n) if n.is_finite() => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            RawCell::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Numeric value of the cell.
    ///
    /// Text is accepted when it parses as a plain decimal after removing
    /// thousands separators.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            RawCell::Number(n) => Decimal::from_f64(*n),
            RawCell::Text(s) => parse_decimal_text(s),
            _ => None,
        }
    }
}

pub(crate) fn parse_decimal_text(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// One worksheet as a dense grid of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Number of columns spanned by the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Cell at an absolute position; cells outside a short row are empty.
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        const EMPTY: &RawCell = &RawCell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

/// All worksheets of one uploaded file, in workbook order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawWorkbook {
    pub sheets: Vec<RawSheet>,
}

impl RawWorkbook {
    pub fn new(sheets: Vec<RawSheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }
}
