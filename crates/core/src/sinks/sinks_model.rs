use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::snapshots::HoldingRecord;

/// One document per holding, as stored by document-oriented sinks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SinkDocument {
    #[serde(rename = "Share Name")]
    pub share_name: String,
    /// Whole shares; fractional parts are truncated.
    #[serde(rename = "Shares Held")]
    pub shares_held: i64,
}

impl SinkDocument {
    /// `None` when the share count does not fit an integer.
    pub fn from_record(record: &HoldingRecord) -> Option<Self> {
        Some(Self {
            share_name: record.security_name.clone(),
            shares_held: record.shares_held.trunc().to_i64()?,
        })
    }
}
