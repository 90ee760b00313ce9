//! Document sink writing one JSON document per holding.
//!
//! Documents are appended to a `.jsonl` collection file per ingestion date,
//! `<dir>/<collection>-<YYYY-MM-DD>.jsonl`.

use chrono::NaiveDate;
use log::warn;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use fundledger_core::sinks::{SinkDocument, SnapshotSinkTrait};
use fundledger_core::snapshots::Snapshot;
use fundledger_core::Result;

use crate::errors::StorageResult;

pub const DEFAULT_COLLECTION: &str = "holdings_data";

pub struct JsonlDocumentSink {
    dir: PathBuf,
    collection: String,
}

impl JsonlDocumentSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection_path(&self, ingestion_date: NaiveDate) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.jsonl",
            self.collection,
            ingestion_date.format("%Y-%m-%d")
        ))
    }

    fn append(&self, documents: &[SinkDocument], ingestion_date: NaiveDate) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.collection_path(ingestion_date))?;
        let mut writer = BufWriter::new(file);
        for document in documents {
            serde_json::to_writer(&mut writer, document)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl SnapshotSinkTrait for JsonlDocumentSink {
    fn name(&self) -> &str {
        "document"
    }

    fn publish(&self, snapshot: &Snapshot, ingestion_date: NaiveDate) -> Result<usize> {
        let documents: Vec<SinkDocument> = snapshot
            .records
            .iter()
            .filter_map(|record| {
                let doc = SinkDocument::from_record(record);
                if doc.is_none() {
                    warn!(
                        "Share count of '{}' does not fit a document, skipping",
                        record.security_name
                    );
                }
                doc
            })
            .collect();

        self.append(&documents, ingestion_date)
            .map_err(|e| e.into_sink(self.name()))?;
        Ok(documents.len())
    }
}
