//! Trait seam for the remote multimodal file/generation service.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RemoteHandle, RequestPart};

/// The remote service boundary: upload a local file, generate text from an
/// ordered sequence of parts, delete an uploaded file.
///
/// Calls are awaited one at a time; the pipeline never holds two remote
/// operations in flight. Implementations apply their own per-call deadlines
/// for upload and delete; generation takes its deadline explicitly.
#[async_trait]
pub trait RemoteFileService: Send + Sync {
    /// Upload one local artifact, returning its remote handle.
    async fn upload(&self, path: &Path) -> Result<RemoteHandle>;

    /// Issue a single generation call over `parts`, in order.
    async fn generate(&self, parts: &[RequestPart], timeout: Duration) -> Result<String>;

    /// Delete one previously uploaded file.
    async fn delete(&self, handle: &RemoteHandle) -> Result<()>;
}
