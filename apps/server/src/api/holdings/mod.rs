pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::main_lib::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings/upload", post(handlers::upload_holdings))
        .route("/holdings/master", get(handlers::get_master))
        .route("/holdings/changes", get(handlers::get_changes))
}
