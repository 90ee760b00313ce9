use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fundledger_core::ingest::{IngestService, IngestServiceTrait};
use fundledger_core::snapshots::HoldingsSchema;
use fundledger_storage_fs::{JsonlDocumentSink, UploadStore, XlsxMasterStore};
use fundledger_storage_sqlite::{db, SqliteHoldingsSink};

use crate::config::Config;

pub struct AppState {
    pub ingest_service: Arc<dyn IngestServiceTrait>,
    pub upload_store: Arc<UploadStore>,
    pub upload_dir: PathBuf,
    pub master_file: PathBuf,
}

pub fn init_tracing() {
    let log_format = std::env::var("FL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let upload_store =
        Arc::new(UploadStore::new(&config.upload_dir).with_reserved(&config.master_file));
    upload_store.ensure_dir()?;
    tracing::info!("Upload directory in use: {}", config.upload_dir.display());

    let master_store = Arc::new(XlsxMasterStore::new(&config.master_file));
    tracing::info!("Master table path in use: {}", config.master_file.display());

    let schema = HoldingsSchema::for_variant(config.schema);
    tracing::info!("Extracting uploads with schema {}", schema.id());

    let mut ingest_service =
        IngestService::new(master_store, schema).with_timezone(config.timezone);

    if let Some(sqlite_path) = &config.sqlite_sink_path {
        let path = sqlite_path.clone();
        let pool = tokio::task::spawn_blocking(move || db::open(&path)).await??;
        tracing::info!("SQLite sink enabled at {}", sqlite_path);
        ingest_service = ingest_service.with_sink(Arc::new(SqliteHoldingsSink::new(pool)));
    }

    if let Some(dir) = &config.document_sink_dir {
        tracing::info!("Document sink enabled in {}", dir.display());
        ingest_service = ingest_service.with_sink(Arc::new(JsonlDocumentSink::new(dir)));
    }

    Ok(Arc::new(AppState {
        ingest_service: Arc::new(ingest_service),
        upload_store,
        upload_dir: config.upload_dir.clone(),
        master_file: config.master_file.clone(),
    }))
}
