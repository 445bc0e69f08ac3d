//! Artifact directory lifecycle.

use std::path::Path;

use tracing::debug;

use adscope_core::{AdscopeError, Result};

/// Ensure `dir` exists and is empty.
///
/// Creates the directory (with parents) if absent; if present, removes it
/// recursively and recreates it. Idempotent. Any filesystem error propagates
/// and aborts the run; the postcondition is an empty directory or a loud
/// failure, never a half-cleared mix.
pub fn prepare_frame_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|e| AdscopeError::io(dir, e))?;
    }
    std::fs::create_dir_all(dir).map_err(|e| AdscopeError::io(dir, e))?;
    debug!("prepared frame directory {}", dir.display());
    Ok(())
}
