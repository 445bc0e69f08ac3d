//! Shared data model for one analysis run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A sampled still persisted to local storage.
///
/// Created by the sampler, read by the upload batch, never mutated. Removed
/// only by whole-directory preparation before the next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Location of the JPEG on disk.
    pub path: PathBuf,
    /// 0-based sample index within the run, contiguous from 0.
    pub sample_index: u32,
    /// Timestamp derived from the sample index, formatted `MM:SS`.
    pub timestamp: String,
}

/// Opaque reference to an artifact after remote upload.
///
/// Owned by exactly one run; deleted remotely once its generation request
/// has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteHandle {
    /// Remote resource name (`files/...`), required for deletion.
    pub name: String,
    /// URI referenced by generation request parts.
    pub uri: String,
    /// MIME type reported by the remote side.
    pub mime_type: String,
}

/// One element of a multi-part generation request.
///
/// The request is an ordered sequence: the instruction text first, then one
/// file part per uploaded artifact in creation order. That order is the only
/// temporal signal the remote model receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPart {
    Text(String),
    File(RemoteHandle),
}

/// Format elapsed sample time as `MM:SS`, truncated to whole seconds.
///
/// Sample `i` sits at `i * 0.5` seconds of footage; the sub-second half is
/// dropped, so consecutive samples share a timestamp (`0 -> 00:00`,
/// `1 -> 00:00`, `2 -> 00:01`, ...). Zero-padding keeps lexical filename
/// order equal to emission order.
pub fn sample_timestamp(sample_index: u32) -> String {
    let whole_seconds = sample_index / 2;
    format!("{:02}:{:02}", whole_seconds / 60, whole_seconds % 60)
}
