//! File-backed storage for Fundledger.
//!
//! This crate implements the file-oriented collaborators of
//! `fundledger-core`:
//! - Reading uploaded spreadsheets into [`fundledger_core::workbook::RawWorkbook`]
//! - The `.xlsx` master table store ([`XlsxMasterStore`])
//! - Filename-addressed storage of raw uploads ([`UploadStore`])
//! - A JSON-lines document sink ([`JsonlDocumentSink`])
//!
//! Every write goes to a temporary sibling file first and is renamed into
//! place, so readers never observe a half-written file.

pub mod document_sink;
pub mod errors;
mod fs_utils;
pub mod master_store;
pub mod uploads;
pub mod workbook_reader;

pub use document_sink::JsonlDocumentSink;
pub use master_store::XlsxMasterStore;
pub use uploads::UploadStore;
pub use workbook_reader::{read_workbook_bytes, read_workbook_path};
