//! Per-invocation scratch directory.
//!
//! Copyright (c) 2025 Posit, PBC

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ScssCompileError;

const SCRATCH_DIR_PREFIX: &str = "semi_compile_temp_path_";

/// Create an empty scratch directory under the system temp directory.
///
/// The directory is named after the current time in milliseconds. If it
/// already exists its contents are removed. It is not cleaned up afterwards.
pub fn prepare_scratch_dir() -> Result<PathBuf, ScssCompileError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!("{SCRATCH_DIR_PREFIX}{millis}"));
    empty_dir(&dir)?;
    tracing::debug!(path = %dir.display(), "Prepared scratch directory");
    Ok(dir)
}

/// Ensure `dir` exists and is empty.
pub(crate) fn empty_dir(dir: &Path) -> Result<(), ScssCompileError> {
    if dir.is_dir() {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
    } else {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
