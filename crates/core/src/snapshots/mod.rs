//! Snapshots module - extraction of one holdings export into normalized records.

mod extractor;
mod ranking;
mod schema;
mod snapshots_model;

pub use extractor::extract_snapshot;
pub use ranking::{coerce_weight, rank_by_weight};
pub use schema::{HoldingsSchema, SchemaVariant};
pub use snapshots_model::{HoldingRecord, Snapshot};
