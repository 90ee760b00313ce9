//! Positional layout of the vendor's daily holdings export.
//!
//! The export has no stable header labels, so columns are addressed by
//! position. Every position lives here, under a schema name and version, so
//! a layout change means a new descriptor instead of edits scattered through
//! the extractor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::HOLDINGS_SHEET_NAME;

/// Which columns an upload is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Security name and shares held.
    Basic,
    /// Security name, shares held and portfolio weight.
    #[default]
    Full,
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(SchemaVariant::Basic),
            "full" => Ok(SchemaVariant::Full),
            other => Err(format!(
                "unknown schema variant '{}', expected 'basic' or 'full'",
                other
            )),
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaVariant::Basic => write!(f, "basic"),
            SchemaVariant::Full => write!(f, "full"),
        }
    }
}

/// Named, versioned column-position descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSchema {
    pub name: &'static str,
    pub version: u32,
    pub sheet_name: &'static str,
    /// Absolute row carrying the export's own column header.
    pub header_row: usize,
    /// Boilerplate rows between the header row and the first holding.
    pub preamble_rows: usize,
    pub name_column: usize,
    pub shares_column: usize,
    pub weight_column: Option<usize>,
}

impl HoldingsSchema {
    /// Daily holdings export, name and shares only.
    pub const fn daily_holdings_basic() -> Self {
        Self {
            name: "daily-holdings-basic",
            version: 1,
            sheet_name: HOLDINGS_SHEET_NAME,
            header_row: 0,
            preamble_rows: 4,
            name_column: 0,
            shares_column: 6,
            weight_column: None,
        }
    }

    /// Daily holdings export including the weight column.
    pub const fn daily_holdings_full() -> Self {
        Self {
            name: "daily-holdings-full",
            version: 1,
            sheet_name: HOLDINGS_SHEET_NAME,
            header_row: 0,
            preamble_rows: 4,
            name_column: 0,
            shares_column: 6,
            weight_column: Some(7),
        }
    }

    pub fn for_variant(variant: SchemaVariant) -> Self {
        match variant {
            SchemaVariant::Basic => Self::daily_holdings_basic(),
            SchemaVariant::Full => Self::daily_holdings_full(),
        }
    }

    /// `name@vN`, recorded on every snapshot extracted with this schema.
    pub fn id(&self) -> String {
        format!("{}@v{}", self.name, self.version)
    }

    pub fn first_data_row(&self) -> usize {
        self.header_row + 1 + self.preamble_rows
    }

    /// Minimum sheet width needed to address every selected column.
    pub fn required_columns(&self) -> usize {
        let widest = self
            .weight_column
            .unwrap_or(0)
            .max(self.name_column)
            .max(self.shares_column);
        widest + 1
    }

    pub fn carries_weight(&self) -> bool {
        self.weight_column.is_some()
    }
}

impl Default for HoldingsSchema {
    fn default() -> Self {
        Self::daily_holdings_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_starts_after_header_and_preamble() {
        let schema = HoldingsSchema::daily_holdings_full();
        assert_eq!(schema.first_data_row(), 5);
        assert_eq!(schema.required_columns(), 8);
        assert_eq!(HoldingsSchema::daily_holdings_basic().required_columns(), 7);
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("FULL".parse::<SchemaVariant>(), Ok(SchemaVariant::Full));
        assert_eq!(" basic ".parse::<SchemaVariant>(), Ok(SchemaVariant::Basic));
        assert!("wide".parse::<SchemaVariant>().is_err());
    }

    #[test]
    fn id_carries_version() {
        assert_eq!(
            HoldingsSchema::daily_holdings_basic().id(),
            "daily-holdings-basic@v1"
        );
    }
}
