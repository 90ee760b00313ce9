//! SQLite sink for Fundledger.
//!
//! This crate stores every ingested snapshot as relational rows using
//! Diesel ORM with SQLite. It implements the `SnapshotSinkTrait` defined in
//! `fundledger-core` and contains:
//! - Database initialization, connection pooling and embedded migrations
//! - The `holdings_records` table and its Diesel models
//! - [`SqliteHoldingsSink`]
//!
//! ```text
//! core (IngestService)
//!        │ SnapshotSinkTrait
//!        ▼
//! storage-sqlite (this crate)
//!        │
//!        ▼
//!    SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod holdings;
pub mod schema;

pub use holdings::SqliteHoldingsSink;
