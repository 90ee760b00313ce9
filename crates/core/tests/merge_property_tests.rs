//! Property-based integration tests for the master table merge.
//!
//! These tests verify that the outer join and cumulative change properties
//! hold across random snapshots, using the `proptest` crate.

use fundledger_core::analytics::{apply_total_change, total_change};
use fundledger_core::master::{merge_snapshot, CellValue, MasterTable};
use fundledger_core::snapshots::{HoldingRecord, Snapshot};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

// =============================================================================
// Generators
// =============================================================================

/// Generates a snapshot with unique security names drawn from a small pool,
/// so consecutive snapshots overlap often.
fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    proptest::collection::btree_map("[A-H]{1,2}", 0i64..1_000_000, 1..12).prop_map(
        |holdings: BTreeMap<String, i64>| {
            Snapshot::new(
                "prop@v1",
                holdings
                    .into_iter()
                    .map(|(name, shares)| HoldingRecord::new(name, Decimal::from(shares)))
                    .collect(),
            )
        },
    )
}

fn names(snapshot: &Snapshot) -> HashSet<String> {
    snapshot.security_names().map(str::to_string).collect()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The merged key set is exactly the union of both snapshots' names.
    #[test]
    fn prop_merge_yields_union_of_names(a in arb_snapshot(), b in arb_snapshot()) {
        let first = merge_snapshot(&MasterTable::empty(), &a, "Shares Held (2025-01-01)").unwrap();
        let merged = merge_snapshot(&first, &b, "Shares Held (2025-01-02)").unwrap();

        let expected: HashSet<String> = names(&a).union(&names(&b)).cloned().collect();
        let actual: HashSet<String> = merged.security_names().into_iter().collect();

        prop_assert_eq!(&actual, &expected);
        prop_assert!(merged.row_count() <= a.len() + b.len());
        prop_assert!(merged.row_count() >= a.len().max(b.len()));
    }

    /// Every security appears in exactly one row after the join.
    #[test]
    fn prop_each_security_has_exactly_one_row(a in arb_snapshot(), b in arb_snapshot()) {
        let first = merge_snapshot(&MasterTable::empty(), &a, "Shares Held (2025-01-01)").unwrap();
        let merged = merge_snapshot(&first, &b, "Shares Held (2025-01-02)").unwrap();

        let all = merged.security_names();
        let unique: HashSet<&String> = all.iter().collect();
        prop_assert_eq!(all.len(), unique.len());
    }

    /// Dated cells hold the snapshot value when present and are empty otherwise.
    #[test]
    fn prop_cells_reflect_membership(a in arb_snapshot(), b in arb_snapshot()) {
        let first = merge_snapshot(&MasterTable::empty(), &a, "Shares Held (2025-01-01)").unwrap();
        let merged = merge_snapshot(&first, &b, "Shares Held (2025-01-02)").unwrap();

        for record in &b.records {
            prop_assert_eq!(
                merged.value(&record.security_name, "Shares Held (2025-01-02)"),
                Some(&CellValue::Number(record.shares_held))
            );
        }
        for name in names(&a).difference(&names(&b)) {
            prop_assert_eq!(
                merged.value(name, "Shares Held (2025-01-02)"),
                Some(&CellValue::Empty)
            );
        }
    }

    /// Without gaps the cumulative change telescopes to last minus first.
    #[test]
    fn prop_total_change_telescopes(values in proptest::collection::vec(-10_000i64..10_000, 2..8)) {
        let decimals: Vec<Option<Decimal>> = values.iter().map(|v| Some(Decimal::from(*v))).collect();
        let expected = Decimal::from(values[values.len() - 1] - values[0]);
        prop_assert_eq!(total_change(&decimals), Some(expected));
    }

    /// The derived column is always last and present only with two or more dated columns.
    #[test]
    fn prop_total_change_column_is_last(snapshots in proptest::collection::vec(arb_snapshot(), 1..4)) {
        let mut master = MasterTable::empty();
        for (idx, snapshot) in snapshots.iter().enumerate() {
            let column = format!("Shares Held (2025-01-0{})", idx + 1);
            master = merge_snapshot(&master, snapshot, &column).unwrap();
            apply_total_change(&mut master).unwrap();
        }

        let has_total = master.columns().iter().any(|c| c == "Total Change in Shares");
        prop_assert_eq!(has_total, snapshots.len() >= 2);
        if has_total {
            prop_assert_eq!(master.columns().last().map(String::as_str), Some("Total Change in Shares"));
        }
    }
}
