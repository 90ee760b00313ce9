//! Fundledger Core - holdings snapshots, master table merge and analytics.
//!
//! This crate contains the domain logic for turning periodic fund holdings
//! exports into one accumulated "master" table. It is storage-agnostic:
//! spreadsheet parsing, master table persistence and secondary sinks are
//! expressed as traits and plain data types implemented by the
//! `storage-fs` and `storage-sqlite` crates.
//!
//! ```text
//! RawWorkbook ──extract──▶ Snapshot ──rank──▶ merge ◀── MasterTable (store)
//!                                               │
//!                                               ▼
//!                                    analytics ──▶ save ──▶ sinks
//! ```

pub mod analytics;
pub mod constants;
pub mod errors;
pub mod ingest;
pub mod master;
pub mod sinks;
pub mod snapshots;
pub mod utils;
pub mod workbook;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
