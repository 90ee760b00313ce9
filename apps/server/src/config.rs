use anyhow::Context;
use chrono_tz::Tz;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

use fundledger_core::snapshots::SchemaVariant;
use fundledger_core::utils::time_utils::parse_timezone;

const MASTER_FILE_NAME: &str = "master_holdings.xlsx";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub master_file: PathBuf,
    pub schema: SchemaVariant,
    pub timezone: Tz,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub max_upload_bytes: usize,
    /// Enables the SQLite sink when set.
    pub sqlite_sink_path: Option<String>,
    /// Enables the JSON-lines document sink when set.
    pub document_sink_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("FL_LISTEN_ADDR", "0.0.0.0:5000")
            .parse()
            .context("Invalid FL_LISTEN_ADDR")?;
        let upload_dir = PathBuf::from(env_or("FL_UPLOAD_DIR", "uploads"));
        let master_file = std::env::var("FL_MASTER_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| upload_dir.join(MASTER_FILE_NAME));
        let schema: SchemaVariant = env_or("FL_SCHEMA", "full")
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid FL_SCHEMA: {}", e))?;
        let timezone = parse_timezone(&env_or("FL_TIMEZONE", "UTC"))
            .map_err(|e| anyhow::anyhow!("Invalid FL_TIMEZONE: {}", e))?;
        let cors_allow = env_or("FL_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("FL_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid FL_REQUEST_TIMEOUT_MS")?;
        let max_upload_bytes: usize = env_or("FL_MAX_UPLOAD_BYTES", "20971520")
            .parse()
            .context("Invalid FL_MAX_UPLOAD_BYTES")?;
        let sqlite_sink_path = optional_env("FL_SQLITE_SINK_PATH");
        let document_sink_dir = optional_env("FL_DOCUMENT_SINK_DIR").map(PathBuf::from);

        Ok(Self {
            listen_addr,
            upload_dir,
            master_file,
            schema,
            timezone,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            max_upload_bytes,
            sqlite_sink_path,
            document_sink_dir,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
