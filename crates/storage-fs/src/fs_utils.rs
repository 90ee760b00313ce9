use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::{StorageError, StorageResult};

/// Temporary sibling of `target`, in the same directory so the final
/// rename stays on one filesystem.
fn temp_sibling(target: &Path) -> PathBuf {
    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()))
}

/// Writes `target` through `write` into a temporary file, then renames it
/// over `target`. On failure the temporary file is removed and `target`
/// is left as it was.
pub(crate) fn write_atomically<F>(target: &Path, write: F) -> StorageResult<()>
where
    F: FnOnce(&Path) -> StorageResult<()>,
{
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_sibling(target);
    let result = write(&tmp).and_then(|_| fs::rename(&tmp, target).map_err(StorageError::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn replaces_target_in_one_step() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("file.txt");

        write_atomically(&target, |tmp| Ok(fs::write(tmp, "first")?)).unwrap();
        write_atomically(&target, |tmp| Ok(fs::write(tmp, "second")?)).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert_eq!(fs::read_dir(target.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_content() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("file.txt");
        fs::write(&target, "original").unwrap();

        let result = write_atomically(&target, |tmp| {
            fs::write(tmp, "partial")?;
            Err(StorageError::Layout("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&target).unwrap(), "original");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
