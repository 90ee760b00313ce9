use chrono::NaiveDate;
use diesel::prelude::*;
use log::{debug, info};
use std::sync::Arc;

use fundledger_core::errors::Result;
use fundledger_core::sinks::SnapshotSinkTrait;
use fundledger_core::snapshots::{HoldingRecord, Snapshot};

use super::model::{HoldingRecordDB, NewHoldingRecordDB};
use crate::db::{get_connection, DbPool};
use crate::errors::{StorageError, StorageResult, SINK_NAME};
use crate::schema::holdings_records::dsl::*;

/// Writes each snapshot into the `holdings_records` table.
///
/// All records of one snapshot are inserted in a single transaction, so a
/// failing publish leaves no partial snapshot behind.
pub struct SqliteHoldingsSink {
    pool: Arc<DbPool>,
}

impl SqliteHoldingsSink {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Records stored for one ingestion date, in insertion order.
    pub fn load_for_date(&self, date: NaiveDate) -> Result<Vec<HoldingRecord>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = holdings_records
            .filter(recorded_on.eq(date))
            .order(id.asc())
            .select(HoldingRecordDB::as_select())
            .load::<HoldingRecordDB>(&mut conn)
            .map_err(StorageError::from)?;

        let records = rows
            .into_iter()
            .map(HoldingRecord::try_from)
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(records)
    }

    /// Distinct ingestion dates, oldest first.
    pub fn recorded_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut conn = get_connection(&self.pool)?;
        let dates = holdings_records
            .select(recorded_on)
            .distinct()
            .order(recorded_on.asc())
            .load::<NaiveDate>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(dates)
    }
}

impl SnapshotSinkTrait for SqliteHoldingsSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    fn publish(&self, snapshot: &Snapshot, ingestion_date: NaiveDate) -> Result<usize> {
        let rows: Vec<NewHoldingRecordDB> = snapshot
            .records
            .iter()
            .map(|record| NewHoldingRecordDB::from_record(record, ingestion_date, &snapshot.schema))
            .collect();
        if rows.is_empty() {
            debug!("Snapshot is empty, nothing to insert");
            return Ok(0);
        }

        let mut conn = get_connection(&self.pool)?;
        let inserted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                diesel::insert_into(holdings_records)
                    .values(&rows)
                    .execute(conn)
            })
            .map_err(StorageError::from)?;

        info!(
            "Inserted {} holdings for {} into SQLite",
            inserted, ingestion_date
        );
        Ok(inserted)
    }
}
