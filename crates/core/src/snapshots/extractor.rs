use log::{debug, info, warn};
use std::collections::HashSet;

use super::ranking::coerce_weight;
use super::schema::HoldingsSchema;
use super::snapshots_model::{HoldingRecord, Snapshot};
use crate::errors::{ExtractionError, Result};
use crate::workbook::{RawSheet, RawWorkbook};

/// Extracts the normalized holdings records from a raw workbook.
///
/// Rows before [`HoldingsSchema::first_data_row`] are skipped. A row is
/// dropped when any selected cell is missing or when its share count is not
/// numeric. A present but unparseable weight is kept as `None`. The first
/// occurrence of a security name wins.
pub fn extract_snapshot(workbook: &RawWorkbook, schema: &HoldingsSchema) -> Result<Snapshot> {
    let sheet = workbook
        .sheet(schema.sheet_name)
        .ok_or_else(|| ExtractionError::SheetNotFound {
            sheet: schema.sheet_name.to_string(),
            available: workbook.sheet_names(),
        })?;

    let found = sheet.width();
    let required = schema.required_columns();
    if found < required {
        return Err(ExtractionError::TooFewColumns {
            schema: schema.id(),
            sheet: sheet.name.clone(),
            required,
            found,
        }
        .into());
    }

    let records = collect_records(sheet, schema);
    if records.is_empty() {
        return Err(ExtractionError::NoRecords {
            schema: schema.id(),
            sheet: sheet.name.clone(),
        }
        .into());
    }

    info!(
        "Extracted {} holdings from sheet '{}' using schema {}",
        records.len(),
        sheet.name,
        schema.id()
    );
    Ok(Snapshot::new(schema.id(), records))
}

fn collect_records(sheet: &RawSheet, schema: &HoldingsSchema) -> Vec<HoldingRecord> {
    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut dropped = 0usize;

    for row in schema.first_data_row()..sheet.height() {
        let name_cell = sheet.cell(row, schema.name_column);
        let shares_cell = sheet.cell(row, schema.shares_column);
        let weight_cell = schema.weight_column.map(|col| sheet.cell(row, col));

        if name_cell.is_missing()
            || shares_cell.is_missing()
            || weight_cell.is_some_and(|c| c.is_missing())
        {
            dropped += 1;
            continue;
        }

        let (Some(security_name), Some(shares_held)) = (name_cell.as_text(), shares_cell.as_decimal())
        else {
            debug!("Row {} has a non-numeric share count, skipping", row);
            dropped += 1;
            continue;
        };

        if !seen.insert(security_name.clone()) {
            warn!(
                "Security '{}' repeated at row {}, keeping the first occurrence",
                security_name, row
            );
            continue;
        }

        let weight = weight_cell.and_then(coerce_weight);
        records.push(HoldingRecord::new(security_name, shares_held).with_weight(weight));
    }

    if dropped > 0 {
        debug!("Dropped {} incomplete rows from sheet '{}'", dropped, sheet.name);
    }
    records
}
