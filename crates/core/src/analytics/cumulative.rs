use log::warn;
use rust_decimal::Decimal;

use crate::constants::TOTAL_CHANGE_COLUMN;
use crate::errors::Result;
use crate::master::{CellValue, MasterTable};

/// Sum of successive differences across a row of dated values.
///
/// A difference touching an empty value is left out of the sum rather than
/// counted as zero, and so is one that overflows `Decimal`. When no
/// difference can be computed the result is `None`. Without gaps this
/// telescopes to `last - first`.
pub fn total_change(values: &[Option<Decimal>]) -> Option<Decimal> {
    values
        .windows(2)
        .filter_map(|pair| match (pair[0], pair[1]) {
            (Some(prev), Some(next)) => next.checked_sub(prev).or_else(|| {
                warn!("Share difference {} -> {} overflows, skipped", prev, next);
                None
            }),
            _ => None,
        })
        .fold(None, |acc, diff| {
            let sum = acc.unwrap_or(Decimal::ZERO);
            match sum.checked_add(diff) {
                Some(total) => Some(total),
                None => {
                    warn!("Total change overflows at {} + {}, difference skipped", sum, diff);
                    acc
                }
            }
        })
}

/// Recomputes the `Total Change in Shares` column as the last column.
///
/// Dated columns are taken in column (append) order. The column is only
/// present when the table has at least two dated columns; returns whether
/// it was written.
pub fn apply_total_change(table: &mut MasterTable) -> Result<bool> {
    table.remove_column(TOTAL_CHANGE_COLUMN);

    let dated = table.dated_column_indices();
    if dated.len() < 2 {
        return Ok(false);
    }

    let changes: Vec<CellValue> = table
        .rows()
        .iter()
        .map(|row| {
            let values: Vec<Option<Decimal>> =
                dated.iter().map(|&idx| row[idx].as_decimal()).collect();
            CellValue::from(total_change(&values))
        })
        .collect();

    table.push_column(TOTAL_CHANGE_COLUMN, changes)?;
    Ok(true)
}
