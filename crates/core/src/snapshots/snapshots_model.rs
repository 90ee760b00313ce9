//! Snapshot domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One security line of a holdings export after cleaning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRecord {
    pub security_name: String,
    pub shares_held: Decimal,
    /// `None` when the schema has no weight column or the value did not coerce.
    pub weight: Option<Decimal>,
}

impl HoldingRecord {
    pub fn new(security_name: impl Into<String>, shares_held: Decimal) -> Self {
        Self {
            security_name: security_name.into(),
            shares_held,
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: Option<Decimal>) -> Self {
        self.weight = weight;
        self
    }
}

/// Normalized records extracted from a single uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// `name@version` of the schema the records were extracted with.
    pub schema: String,
    pub records: Vec<HoldingRecord>,
}

impl Snapshot {
    pub fn new(schema: impl Into<String>, records: Vec<HoldingRecord>) -> Self {
        Self {
            schema: schema.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn security_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.security_name.as_str())
    }
}
