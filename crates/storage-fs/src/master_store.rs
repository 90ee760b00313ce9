//! `.xlsx` persistence of the master table.

use log::{debug, info};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

use fundledger_core::master::{CellValue, MasterStoreTrait, MasterTable};
use fundledger_core::workbook::{RawCell, RawSheet};
use fundledger_core::Result;

use crate::errors::{StorageError, StorageResult};
use crate::fs_utils::write_atomically;
use crate::workbook_reader::collect_sheets;

const MASTER_SHEET_NAME: &str = "Sheet1";

/// Master table stored as a single-sheet workbook: the header row holds the
/// column names, one row per security follows.
pub struct XlsxMasterStore {
    path: PathBuf,
}

impl XlsxMasterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> StorageResult<MasterTable> {
        let mut sheets = calamine::open_workbook_auto(&self.path)?;
        let workbook = collect_sheets(&mut sheets)?;
        let sheet = workbook
            .sheets
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Layout("workbook has no sheets".to_string()))?;
        sheet_to_table(sheet)
    }

    fn write_table(&self, table: &MasterTable, target: &Path) -> StorageResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(MASTER_SHEET_NAME)?;
        let header_format = Format::new().set_bold();

        for (col, name) in table.columns().iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, name, &header_format)?;
        }

        for (row_idx, row) in table.rows().iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(s) => {
                        worksheet.write_string(row_num, col as u16, s)?;
                    }
                    CellValue::Number(d) => {
                        let value = d.to_f64().ok_or_else(|| {
                            StorageError::Layout(format!("number {} does not fit a cell", d))
                        })?;
                        worksheet.write_number(row_num, col as u16, value)?;
                    }
                }
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        workbook.save(target)?;
        Ok(())
    }
}

/// First row is the header; blank header cells get pandas-style names.
fn sheet_to_table(sheet: RawSheet) -> StorageResult<MasterTable> {
    let mut rows = sheet.rows.into_iter();
    let Some(header) = rows.next() else {
        return Ok(MasterTable::empty());
    };

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| cell.as_text().unwrap_or_else(|| format!("Unnamed: {}", idx)))
        .collect();

    let body: Vec<Vec<CellValue>> = rows
        .filter(|row| row.iter().any(|c| !c.is_missing()))
        .map(|row| {
            let mut cells: Vec<CellValue> = row.into_iter().map(to_cell_value).collect();
            cells.resize(columns.len(), CellValue::Empty);
            cells
        })
        .collect();

    MasterTable::from_parts(columns, body).map_err(|e| StorageError::Layout(e.to_string()))
}

fn to_cell_value(cell: RawCell) -> CellValue {
    match cell {
        RawCell::Empty => CellValue::Empty,
        RawCell::Text(s) if s.trim().is_empty() => CellValue::Empty,
        RawCell::Text(s) => CellValue::Text(s),
        RawCell::Number(n) => Decimal::from_f64(n).map(CellValue::Number).unwrap_or_default(),
        RawCell::Bool(b) => CellValue::Text(b.to_string()),
    }
}

impl MasterStoreTrait for XlsxMasterStore {
    fn load(&self) -> Result<Option<MasterTable>> {
        if !self.path.exists() {
            debug!("No master table at {}", self.path.display());
            return Ok(None);
        }
        self.read_table()
            .map(Some)
            .map_err(|e| e.into_read(&self.path))
    }

    fn save(&self, table: &MasterTable) -> Result<()> {
        write_atomically(&self.path, |tmp| self.write_table(table, tmp))
            .map_err(|e| e.into_write(&self.path))?;
        info!(
            "Wrote master table with {} rows and {} columns to {}",
            table.row_count(),
            table.columns().len(),
            self.path.display()
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundledger_core::errors::{Error, PersistenceError};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn sample() -> MasterTable {
        MasterTable::from_parts(
            vec![
                "Share Name".to_string(),
                "Shares Held (2025-03-01)".to_string(),
                "Shares Held (2025-03-02)".to_string(),
                "Total Change in Shares".to_string(),
            ],
            vec![
                vec![
                    CellValue::Text("AAPL".into()),
                    CellValue::Number(dec!(100)),
                    CellValue::Number(dec!(110.5)),
                    CellValue::Number(dec!(10.5)),
                ],
                vec![
                    CellValue::Text("MSFT".into()),
                    CellValue::Number(dec!(200)),
                    CellValue::Empty,
                    CellValue::Empty,
                ],
                vec![
                    CellValue::Text("GOOG".into()),
                    CellValue::Empty,
                    CellValue::Number(dec!(50)),
                    CellValue::Empty,
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let store = XlsxMasterStore::new(dir.path().join("master_holdings.xlsx"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn saved_table_loads_back_unchanged() {
        let dir = tempdir().unwrap();
        let store = XlsxMasterStore::new(dir.path().join("uploads").join("master_holdings.xlsx"));

        store.save(&sample()).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, sample());
    }

    #[test]
    fn key_only_table_keeps_its_header() {
        let dir = tempdir().unwrap();
        let store = XlsxMasterStore::new(dir.path().join("master_holdings.xlsx"));

        store.save(&MasterTable::empty()).unwrap();

        assert_eq!(store.load().unwrap().unwrap(), MasterTable::empty());
    }

    #[test]
    fn corrupt_file_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("master_holdings.xlsx");
        std::fs::write(&path, b"not a workbook").unwrap();

        let err = XlsxMasterStore::new(&path).load().unwrap_err();

        assert!(matches!(err, Error::Persistence(PersistenceError::Read { .. })));
    }
}
