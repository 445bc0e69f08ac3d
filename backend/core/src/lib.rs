pub mod error;
pub mod traits;
pub mod types;

pub use error::{AdscopeError, Result};
pub use traits::RemoteFileService;
pub use types::{sample_timestamp, Artifact, RemoteHandle, RequestPart};
