use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the AdScope pipeline.
///
/// Each variant identifies the stage that failed; none of the remote
/// operations are retried here, so a variant surfaces exactly once per run.
#[derive(Debug, Error)]
pub enum AdscopeError {
    #[error("filesystem error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported video source: {0}")]
    UnsupportedSource(String),

    #[error("upload failed for artifact {artifact}: {message}")]
    Upload { artifact: String, message: String },

    #[error("generation timed out after {seconds}s")]
    GenerationTimeout { seconds: u64 },

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("remote delete failed for {handle}: {message}")]
    Delete { handle: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AdscopeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdscopeError>;
