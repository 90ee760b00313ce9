use chrono::NaiveDate;

use crate::errors::Result;
use crate::snapshots::Snapshot;

/// Secondary destination receiving every ingested snapshot.
///
/// Sinks run after the master table has been saved. A failing sink is
/// reported to the caller but never undoes the master table write.
pub trait SnapshotSinkTrait: Send + Sync {
    /// Short identifier used in logs and error reports.
    fn name(&self) -> &str;

    /// Publishes the snapshot records, returning how many were written.
    fn publish(&self, snapshot: &Snapshot, ingestion_date: NaiveDate) -> Result<usize>;
}
