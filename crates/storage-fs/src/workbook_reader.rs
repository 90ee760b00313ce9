//! Reads spreadsheet files into the core's raw workbook model.

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use log::debug;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use fundledger_core::workbook::{RawCell, RawSheet, RawWorkbook};
use fundledger_core::Result;

use crate::errors::StorageResult;

/// Parses an uploaded spreadsheet (`.xlsx`, `.xls`, `.ods`) held in memory.
pub fn read_workbook_bytes(bytes: &[u8]) -> Result<RawWorkbook> {
    open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(Into::into)
        .and_then(|mut sheets| collect_sheets(&mut sheets))
        .map_err(|e| e.into_extraction())
}

/// Parses a spreadsheet file on disk.
pub fn read_workbook_path(path: &Path) -> Result<RawWorkbook> {
    open_workbook_auto(path)
        .map_err(Into::into)
        .and_then(|mut sheets| collect_sheets(&mut sheets))
        .map_err(|e| e.into_extraction())
}

pub(crate) fn collect_sheets<RS: Read + Seek>(sheets: &mut Sheets<RS>) -> StorageResult<RawWorkbook> {
    let names = sheets.sheet_names();
    let mut raw_sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = sheets.worksheet_range(&name)?;
        let rows = range_to_rows(&range);
        debug!("Read sheet '{}' with {} rows", name, rows.len());
        raw_sheets.push(RawSheet::new(name, rows));
    }
    Ok(RawWorkbook::new(raw_sheets))
}

/// Expands a range to absolute positions: calamine ranges start at the
/// first used cell, the raw model always starts at A1.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<RawCell>> {
    let Some((end_row, end_col)) = range.end() else {
        return Vec::new();
    };
    (0..=end_row)
        .map(|row| {
            (0..=end_col)
                .map(|col| {
                    range
                        .get_value((row, col))
                        .map(convert_cell)
                        .unwrap_or(RawCell::Empty)
                })
                .collect()
        })
        .collect()
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty | Data::Error(_) => RawCell::Empty,
        Data::String(s) => RawCell::Text(s.clone()),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => RawCell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
    }
}
