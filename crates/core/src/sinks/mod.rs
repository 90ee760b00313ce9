//! Sinks module - optional secondary destinations for extracted snapshots.

mod sinks_model;
mod sinks_traits;

pub use sinks_model::SinkDocument;
pub use sinks_traits::SnapshotSinkTrait;
