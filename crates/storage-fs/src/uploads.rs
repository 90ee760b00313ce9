//! Filename-addressed storage of raw uploaded files.

use log::info;
use std::fs;
use std::path::{Component, Path, PathBuf};

use fundledger_core::errors::{InputError, PersistenceError};
use fundledger_core::Result;

use crate::fs_utils::write_atomically;

pub struct UploadStore {
    dir: PathBuf,
    reserved: Vec<PathBuf>,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reserved: Vec::new(),
        }
    }

    /// Marks `path` as off-limits for uploads. Used for the master table
    /// when it lives inside the upload directory.
    pub fn with_reserved(mut self, path: impl Into<PathBuf>) -> Self {
        self.reserved.push(path.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the upload directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            PersistenceError::Upload {
                name: self.dir.display().to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Stores `bytes` under the final component of `file_name`, replacing
    /// an earlier upload of the same name.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let name = sanitize_file_name(file_name)?;
        if bytes.is_empty() {
            return Err(InputError::EmptyFile(name).into());
        }

        let target = self.dir.join(&name);
        if self.is_reserved(&target) {
            return Err(InputError::ReservedFilename(name).into());
        }
        write_atomically(&target, |tmp| Ok(fs::write(tmp, bytes)?)).map_err(|e| {
            PersistenceError::Upload {
                name: name.clone(),
                message: e.to_string(),
            }
        })?;
        info!("Stored upload '{}' ({} bytes)", target.display(), bytes.len());
        Ok(target)
    }

    /// Compares by file name and canonical parent directory so a differently
    /// spelled upload directory still matches.
    fn is_reserved(&self, target: &Path) -> bool {
        self.reserved.iter().any(|reserved| {
            if reserved == target {
                return true;
            }
            if reserved.file_name() != target.file_name() {
                return false;
            }
            match (
                reserved.parent().map(fs::canonicalize),
                fs::canonicalize(&self.dir),
            ) {
                (Some(Ok(reserved_dir)), Ok(dir)) => reserved_dir == dir,
                _ => false,
            }
        })
    }
}

/// Keeps only the last normal path component so uploads cannot escape the
/// upload directory.
fn sanitize_file_name(file_name: &str) -> Result<String> {
    let trimmed = file_name.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyFilename.into());
    }
    let normalized = trimmed.replace('\\', "/");
    match Path::new(&normalized).components().next_back() {
        Some(Component::Normal(name)) => Ok(name.to_string_lossy().into_owned()),
        _ => Err(InputError::InvalidFilename(file_name.to_string()).into()),
    }
}
