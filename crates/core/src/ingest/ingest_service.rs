use chrono::NaiveDate;
use chrono_tz::Tz;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use super::ingest_model::{IngestOutcome, SinkFailure};
use crate::analytics::apply_total_change;
use crate::errors::Result;
use crate::master::{dated_column_name, merge_snapshot, MasterStoreTrait, MasterTable};
use crate::sinks::SnapshotSinkTrait;
use crate::snapshots::{extract_snapshot, rank_by_weight, HoldingsSchema, Snapshot};
use crate::utils::time_utils::{ingestion_date_today, DEFAULT_INGESTION_TZ};
use crate::workbook::RawWorkbook;

/// Trait for snapshot ingestion operations
pub trait IngestServiceTrait: Send + Sync {
    /// Extracts a snapshot and merges it into the master table under a
    /// column dated `ingestion_date`.
    fn ingest(&self, workbook: &RawWorkbook, ingestion_date: NaiveDate) -> Result<IngestOutcome>;

    /// Same as [`IngestServiceTrait::ingest`] using today's date in the
    /// configured timezone.
    fn ingest_today(&self, workbook: &RawWorkbook) -> Result<IngestOutcome>;

    fn load_master(&self) -> Result<Option<MasterTable>>;

    fn master_location(&self) -> String;

    fn schema(&self) -> &HoldingsSchema;
}

pub struct IngestService {
    store: Arc<dyn MasterStoreTrait>,
    sinks: Vec<Arc<dyn SnapshotSinkTrait>>,
    schema: HoldingsSchema,
    timezone: Tz,
    // Held across load-merge-save so concurrent uploads cannot interleave.
    cycle_lock: Mutex<()>,
}

impl IngestService {
    pub fn new(store: Arc<dyn MasterStoreTrait>, schema: HoldingsSchema) -> Self {
        Self {
            store,
            sinks: Vec::new(),
            schema,
            timezone: DEFAULT_INGESTION_TZ,
            cycle_lock: Mutex::new(()),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn SnapshotSinkTrait>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    fn prepare_snapshot(&self, workbook: &RawWorkbook) -> Result<Snapshot> {
        let mut snapshot = extract_snapshot(workbook, &self.schema)?;
        if self.schema.carries_weight() {
            rank_by_weight(&mut snapshot);
        }
        Ok(snapshot)
    }

    /// Runs the load-merge-save cycle. Nothing is persisted unless every
    /// step before `save` succeeded.
    fn merge_and_save(
        &self,
        snapshot: &Snapshot,
        ingestion_date: NaiveDate,
    ) -> Result<IngestOutcome> {
        let _guard = self
            .cycle_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let master = self.store.load()?.unwrap_or_else(|| {
            debug!("No master table yet, starting from an empty one");
            MasterTable::empty()
        });
        let previous_rows = master.row_count();

        let column = dated_column_name(master.columns(), ingestion_date);
        let mut merged = merge_snapshot(&master, snapshot, &column)?;
        let total_change_computed = apply_total_change(&mut merged)?;

        self.store.save(&merged)?;

        let master_rows = merged.row_count();
        info!(
            "Saved master table to {} ({} securities, column '{}')",
            self.store.location(),
            master_rows,
            column
        );

        Ok(IngestOutcome {
            dated_column: column,
            snapshot_records: snapshot.len(),
            master_rows,
            new_securities: master_rows.saturating_sub(previous_rows),
            total_change_computed,
            master_location: self.store.location(),
            sink_failures: Vec::new(),
        })
    }

    fn publish_to_sinks(&self, snapshot: &Snapshot, ingestion_date: NaiveDate) -> Vec<SinkFailure> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            match sink.publish(snapshot, ingestion_date) {
                Ok(written) => debug!("Sink '{}' stored {} records", sink.name(), written),
                Err(e) => {
                    warn!("Sink '{}' failed: {}", sink.name(), e);
                    failures.push(SinkFailure {
                        sink: sink.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        failures
    }
}

impl IngestServiceTrait for IngestService {
    fn ingest(&self, workbook: &RawWorkbook, ingestion_date: NaiveDate) -> Result<IngestOutcome> {
        let snapshot = self.prepare_snapshot(workbook)?;
        let mut outcome = self.merge_and_save(&snapshot, ingestion_date)?;
        outcome.sink_failures = self.publish_to_sinks(&snapshot, ingestion_date);
        Ok(outcome)
    }

    fn ingest_today(&self, workbook: &RawWorkbook) -> Result<IngestOutcome> {
        self.ingest(workbook, ingestion_date_today(self.timezone))
    }

    fn load_master(&self) -> Result<Option<MasterTable>> {
        self.store.load()
    }

    fn master_location(&self) -> String {
        self.store.location()
    }

    fn schema(&self) -> &HoldingsSchema {
        &self.schema
    }
}
