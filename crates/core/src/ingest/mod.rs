//! Ingest module - the load, merge and save cycle for one uploaded snapshot.

mod ingest_model;
mod ingest_service;

pub use ingest_model::{IngestOutcome, SinkFailure};
pub use ingest_service::{IngestService, IngestServiceTrait};
