use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::main_lib::AppState;

#[utoipa::path(get, path = "/api/v1/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

/// Ready once the upload directory exists and the master file, if any, is
/// a regular file.
#[utoipa::path(
    get,
    path = "/api/v1/readyz",
    responses(
        (status = 200, description = "Ready"),
        (status = 503, description = "Upload directory or master file unusable")
    )
)]
pub async fn readyz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    let master_ok = !state.master_file.exists() || state.master_file.is_file();
    if state.upload_dir.is_dir() && master_ok {
        (StatusCode::OK, "ok")
    } else {
        tracing::warn!(
            "Not ready: upload dir {} or master file {} unusable",
            state.upload_dir.display(),
            state.master_file.display()
        );
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
