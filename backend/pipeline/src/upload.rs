//! Ordered batch upload with all-or-nothing semantics.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use adscope_core::{AdscopeError, RemoteFileService, RemoteHandle, Result};

use crate::cleanup::cleanup;

/// A local artifact paired with its remote handle.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    pub path: PathBuf,
    pub handle: RemoteHandle,
}

/// Upload every file in `dir`, lexically ordered, pairing each with its
/// remote handle.
///
/// Lexical order equals sample emission order, and the remote model infers
/// temporal progression solely from request-part order, so this ordering is
/// a hard requirement. Any single failure aborts the batch: handles already
/// uploaded are reclaimed best-effort, then the upload error propagates. No
/// partial batch ever reaches the request assembler.
pub async fn upload_all(
    dir: &Path,
    service: &dyn RemoteFileService,
) -> Result<Vec<UploadedArtifact>> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map_err(|e| AdscopeError::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    let mut uploaded: Vec<UploadedArtifact> = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        match service.upload(&path).await {
            Ok(handle) => {
                debug!("uploaded {name} as {}", handle.name);
                uploaded.push(UploadedArtifact { path, handle });
            }
            Err(err) => {
                warn!(
                    "upload failed for {name}; rolling back {} uploaded handles",
                    uploaded.len()
                );
                let handles: Vec<RemoteHandle> =
                    uploaded.iter().map(|u| u.handle.clone()).collect();
                cleanup(service, &handles).await;
                return Err(err);
            }
        }
    }
    Ok(uploaded)
}
