use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use tokio::task;

use fundledger_core::analytics::top_movers;
use fundledger_core::errors::{Error as CoreError, InputError};
use fundledger_core::ingest::IngestOutcome;
use fundledger_core::master::MasterTable;
use fundledger_storage_fs::read_workbook_bytes;

use super::dto::{
    ChangesQuery, ChangesResponse, MasterDataResponse, ShareChangeDto, UploadResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;

const UPLOAD_FIELD: &str = "file";
const NO_DATA_MESSAGE: &str = "No data available";

#[utoipa::path(
    post,
    path = "/api/v1/holdings/upload",
    responses(
        (status = 200, body = UploadResponse),
        (status = 400, description = "Missing or empty file"),
        (status = 500, description = "File could not be extracted or merged")
    )
)]
pub async fn upload_holdings(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file content: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload.ok_or(CoreError::Input(InputError::MissingFile))?;
    tracing::info!("Received upload '{}' ({} bytes)", file_name, bytes.len());

    let service = state.ingest_service.clone();
    let uploads = state.upload_store.clone();
    let outcome = task::spawn_blocking(move || -> fundledger_core::Result<IngestOutcome> {
        let stored = uploads.save(&file_name, &bytes)?;
        tracing::debug!("Upload stored at {}", stored.display());
        let workbook = read_workbook_bytes(&bytes)?;
        service.ingest_today(&workbook)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Failed to execute upload task: {}", e)))?
    .map_err(ApiError::from_upload)?;

    let message = if state.ingest_service.schema().carries_weight() {
        "File uploaded, sorted & merged by Weight!"
    } else {
        "File uploaded & merged successfully!"
    };

    Ok(Json(UploadResponse {
        message: message.to_string(),
        updated_file: outcome.master_location,
        dated_column: outcome.dated_column,
        securities: outcome.master_rows,
        sink_failures: outcome.sink_failures.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/holdings/master",
    responses(
        (status = 200, body = MasterDataResponse),
        (status = 404, description = "No upload has been processed yet")
    )
)]
pub async fn get_master(State(state): State<Arc<AppState>>) -> ApiResult<Json<MasterDataResponse>> {
    let master = load_master(&state).await?;
    Ok(Json(MasterDataResponse {
        data: master.to_records(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/holdings/changes",
    params(("limit" = Option<usize>, Query, description = "Maximum number of securities")),
    responses(
        (status = 200, body = ChangesResponse),
        (status = 404, description = "No upload has been processed yet")
    )
)]
pub async fn get_changes(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ChangesQuery>,
) -> ApiResult<Json<ChangesResponse>> {
    let master = load_master(&state).await?;
    let data = top_movers(&master, q.limit)
        .into_iter()
        .map(ShareChangeDto::from)
        .collect();
    Ok(Json(ChangesResponse { data }))
}

async fn load_master(state: &Arc<AppState>) -> ApiResult<MasterTable> {
    let service = state.ingest_service.clone();
    task::spawn_blocking(move || service.load_master())
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to execute read task: {}", e)))??
        .ok_or_else(|| ApiError::NotFound(NO_DATA_MESSAGE.to_string()))
}
