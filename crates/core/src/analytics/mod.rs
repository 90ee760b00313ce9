//! Analytics module - metrics derived from the accumulated dated columns.

mod cumulative;
mod movers;

pub use cumulative::{apply_total_change, total_change};
pub use movers::{top_movers, ShareChange};
