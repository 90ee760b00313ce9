//! Database models for stored holdings.

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use fundledger_core::snapshots::HoldingRecord;

use crate::errors::{StorageError, StorageResult};

/// Database model for a stored holding line.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::holdings_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingRecordDB {
    pub id: i32,
    pub share_name: String,
    pub shares_held: String,
    pub weight: Option<String>,
    pub recorded_on: NaiveDate,
    pub schema_id: String,
}

/// Insertable row; decimals are stored as text to keep them exact.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings_records)]
pub struct NewHoldingRecordDB {
    pub share_name: String,
    pub shares_held: String,
    pub weight: Option<String>,
    pub recorded_on: NaiveDate,
    pub schema_id: String,
}

impl NewHoldingRecordDB {
    pub fn from_record(record: &HoldingRecord, recorded_on: NaiveDate, schema_id: &str) -> Self {
        Self {
            share_name: record.security_name.clone(),
            shares_held: record.shares_held.to_string(),
            weight: record.weight.map(|w| w.to_string()),
            recorded_on,
            schema_id: schema_id.to_string(),
        }
    }
}

impl TryFrom<HoldingRecordDB> for HoldingRecord {
    type Error = StorageError;

    fn try_from(db: HoldingRecordDB) -> StorageResult<Self> {
        let shares_held = Decimal::from_str(&db.shares_held)
            .map_err(|e| StorageError::Decode(format!("shares_held of row {}: {}", db.id, e)))?;
        let weight = db
            .weight
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| StorageError::Decode(format!("weight of row {}: {}", db.id, e)))?;
        Ok(HoldingRecord::new(db.share_name, shares_held).with_weight(weight))
    }
}
