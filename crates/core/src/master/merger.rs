use log::debug;
use std::collections::HashMap;

use super::master_model::{CellValue, MasterTable};
use crate::constants::{SHARE_NAME_COLUMN, TOTAL_CHANGE_COLUMN};
use crate::errors::{MergeError, Result};
use crate::snapshots::Snapshot;

/// Full outer join of a snapshot into the master table on the security name.
///
/// The snapshot's share counts become a new column named `column_name`.
/// Every security from either side appears exactly once; cells are empty
/// where a side has no value. Existing rows keep their order and securities
/// new to the master are appended in snapshot order. The derived total
/// change column is dropped and must be recomputed by the caller.
///
/// The input table is not modified, so a failed merge leaves nothing to undo.
pub fn merge_snapshot(
    master: &MasterTable,
    snapshot: &Snapshot,
    column_name: &str,
) -> Result<MasterTable> {
    let key = master
        .key_index()
        .ok_or_else(|| MergeError::MissingKeyColumn {
            column: SHARE_NAME_COLUMN.to_string(),
            side: "master table".to_string(),
        })?;

    if master.column_index(column_name).is_some() {
        return Err(MergeError::ColumnExists(column_name.to_string()).into());
    }

    let mut positions: HashMap<String, usize> = HashMap::with_capacity(master.row_count());
    for (row_idx, row) in master.rows().iter().enumerate() {
        let name = row[key]
            .as_key()
            .ok_or(MergeError::MissingKeyValue { row: row_idx })?;
        if positions.insert(name.clone(), row_idx).is_some() {
            return Err(MergeError::DuplicateKey(name).into());
        }
    }

    let mut table = master.clone();
    table.remove_column(TOTAL_CHANGE_COLUMN);
    let key = table.key_index().unwrap_or(key);
    let width = table.columns().len();
    let (mut columns, mut rows) = table.into_parts();

    let mut new_column = vec![CellValue::Empty; rows.len()];
    let mut appended = 0usize;
    for record in &snapshot.records {
        match positions.get(&record.security_name) {
            Some(&row_idx) => new_column[row_idx] = CellValue::Number(record.shares_held),
            None => {
                let mut row = vec![CellValue::Empty; width];
                row[key] = CellValue::Text(record.security_name.clone());
                positions.insert(record.security_name.clone(), rows.len());
                rows.push(row);
                new_column.push(CellValue::Number(record.shares_held));
                appended += 1;
            }
        }
    }

    columns.push(column_name.to_string());
    for (row, value) in rows.iter_mut().zip(new_column) {
        row.push(value);
    }

    debug!(
        "Merged {} snapshot rows into column '{}': {} existing, {} new securities",
        snapshot.len(),
        column_name,
        snapshot.len() - appended,
        appended
    );

    Ok(MasterTable::from_parts(columns, rows)?)
}
