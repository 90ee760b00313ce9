use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::cmp::Ordering;

use super::snapshots_model::Snapshot;
use crate::workbook::{parse_decimal_text, RawCell};

/// Coerces a weight cell to a number.
///
/// Accepts numbers and numeric text such as `"3.1"`, `"5.2%"` or `"1,024.5"`.
/// Anything else becomes `None` instead of an error.
pub fn coerce_weight(cell: &RawCell) -> Option<Decimal> {
    match cell {
        RawCell::Number(n) => Decimal::from_f64(*n),
        RawCell::Text(s) => {
            let trimmed = s.trim();
            let without_percent = trimmed.strip_suffix('%').unwrap_or(trimmed);
            parse_decimal_text(without_percent)
        }
        _ => None,
    }
}

/// Sorts snapshot records by weight, ascending.
///
/// Records without a weight go last; ties keep their extraction order.
pub fn rank_by_weight(snapshot: &mut Snapshot) {
    snapshot
        .records
        .sort_by(|a, b| match (a.weight, b.weight) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
}
