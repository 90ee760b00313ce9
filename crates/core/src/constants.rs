/// Join key shared by every snapshot and the master table
pub const SHARE_NAME_COLUMN: &str = "Share Name";

/// Canonical name of the extracted share count column
pub const SHARES_HELD_COLUMN: &str = "Shares Held";

/// Canonical name of the extracted portfolio weight column
pub const WEIGHT_COLUMN: &str = "Weight";

/// Derived analytics column, always kept last in the master table
pub const TOTAL_CHANGE_COLUMN: &str = "Total Change in Shares";

/// Prefix identifying a dated shares-held column, e.g. `Shares Held (2025-03-01)`
pub const DATED_COLUMN_PREFIX: &str = "Shares Held (";

/// Sheet holding per-security rows in the vendor's daily export
pub const HOLDINGS_SHEET_NAME: &str = "holdings";

/// Date format used inside dated column names
pub const DATED_COLUMN_DATE_FORMAT: &str = "%Y-%m-%d";
