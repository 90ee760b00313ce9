use super::master_model::MasterTable;
use crate::errors::Result;

/// Durable storage of the master table.
///
/// `save` replaces the persisted table as a whole. Implementations must
/// never leave a partially written table behind: either the previous table
/// or the new one is visible after `save` returns, whatever the outcome.
pub trait MasterStoreTrait: Send + Sync {
    /// Loads the current table, `None` before the first successful save.
    fn load(&self) -> Result<Option<MasterTable>>;

    fn save(&self, table: &MasterTable) -> Result<()>;

    /// Human readable location of the table (path or URI).
    fn location(&self) -> String;
}
