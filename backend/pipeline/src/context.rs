//! Run-scoped locations and naming.

use std::path::{Path, PathBuf};

use adscope_media::artifact_prefix;

/// Everything one analysis run owns: its scratch directory and its artifact
/// naming. Passed explicitly into every stage so that concurrent or repeated
/// runs can isolate themselves by directory; nothing in the pipeline touches
/// a hardcoded path.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Scratch directory owned exclusively by this run. Recreated empty at
    /// the start of sampling.
    pub frames_dir: PathBuf,
    /// Source-derived artifact name prefix.
    pub name_prefix: String,
    /// Tag inserted between the prefix and the timestamp.
    pub frame_tag: String,
}

impl RunContext {
    /// Context for analyzing `video_path` with artifacts under `frames_dir`.
    pub fn for_video(video_path: &Path, frames_dir: impl Into<PathBuf>) -> Self {
        Self {
            frames_dir: frames_dir.into(),
            name_prefix: artifact_prefix(video_path),
            frame_tag: "_frame".to_string(),
        }
    }
}
