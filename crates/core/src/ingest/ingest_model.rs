use serde::Serialize;

/// Result of a successful ingestion.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// Name of the column the snapshot was written to.
    pub dated_column: String,
    pub snapshot_records: usize,
    pub master_rows: usize,
    /// Securities seen for the first time in this snapshot.
    pub new_securities: usize,
    pub total_change_computed: bool,
    pub master_location: String,
    pub sink_failures: Vec<SinkFailure>,
}

/// A secondary sink that could not take the snapshot.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SinkFailure {
    pub sink: String,
    pub message: String,
}
