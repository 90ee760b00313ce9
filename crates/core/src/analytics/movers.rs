use rust_decimal::Decimal;
use serde::Serialize;

use super::cumulative::total_change;
use crate::master::MasterTable;

/// Cumulative share count change of one security.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareChange {
    pub security_name: String,
    pub total_change: Decimal,
    /// Value in the first dated column, if the security was held then.
    pub first_shares: Option<Decimal>,
    /// Value in the latest dated column, if the security is still held.
    pub latest_shares: Option<Decimal>,
}

/// Securities ordered by the magnitude of their total change, largest first.
///
/// Securities without a computable change are left out. Equal magnitudes
/// are ordered by name.
pub fn top_movers(table: &MasterTable, limit: Option<usize>) -> Vec<ShareChange> {
    let Some(key) = table.key_index() else {
        return Vec::new();
    };
    let dated = table.dated_column_indices();

    let mut changes: Vec<ShareChange> = table
        .rows()
        .iter()
        .filter_map(|row| {
            let security_name = row[key].as_key()?;
            let values: Vec<Option<Decimal>> =
                dated.iter().map(|&idx| row[idx].as_decimal()).collect();
            let total = total_change(&values)?;
            Some(ShareChange {
                security_name,
                total_change: total,
                first_shares: values.first().copied().flatten(),
                latest_shares: values.last().copied().flatten(),
            })
        })
        .collect();

    changes.sort_by(|a, b| {
        b.total_change
            .abs()
            .cmp(&a.total_change.abs())
            .then_with(|| a.security_name.cmp(&b.security_name))
    });
    if let Some(limit) = limit {
        changes.truncate(limit);
    }
    changes
}
