use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use fundledger_core::analytics::ShareChange;
use fundledger_core::ingest::SinkFailure;
use fundledger_core::master::MasterRecord;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct SinkFailureDto {
    pub sink: String,
    pub message: String,
}

impl From<SinkFailure> for SinkFailureDto {
    fn from(f: SinkFailure) -> Self {
        Self {
            sink: f.sink,
            message: f.message,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct UploadResponse {
    pub message: String,
    /// Location of the updated master table.
    pub updated_file: String,
    pub dated_column: String,
    /// Securities in the master table after the merge.
    pub securities: usize,
    pub sink_failures: Vec<SinkFailureDto>,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct MasterDataResponse {
    /// One object per security, keys in master column order.
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<MasterRecord>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChangesQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShareChangeDto {
    pub security_name: String,
    #[schema(value_type = f64)]
    pub total_change: Decimal,
    #[schema(value_type = Option<f64>)]
    pub first_shares: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub latest_shares: Option<Decimal>,
}

impl From<ShareChange> for ShareChangeDto {
    fn from(c: ShareChange) -> Self {
        Self {
            security_name: c.security_name,
            total_change: c.total_change,
            first_shares: c.first_shares,
            latest_shares: c.latest_shares,
        }
    }
}

#[derive(Serialize, ToSchema, Debug, Clone)]
pub struct ChangesResponse {
    pub data: Vec<ShareChangeDto>,
}
