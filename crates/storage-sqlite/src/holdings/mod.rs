//! Relational copy of every ingested snapshot.

mod model;
mod sink;

pub use model::{HoldingRecordDB, NewHoldingRecordDB};
pub use sink::SqliteHoldingsSink;
