//! Master module - the accumulated table of all snapshots and its storage contract.

mod master_model;
mod master_traits;
mod merger;
mod naming;

pub use master_model::{CellValue, MasterRecord, MasterTable};
pub use master_traits::MasterStoreTrait;
pub use merger::merge_snapshot;
pub use naming::{dated_column_name, is_dated_column};
