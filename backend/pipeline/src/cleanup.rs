//! Best-effort remote artifact reclamation.

use tracing::{debug, warn};

use adscope_core::{AdscopeError, RemoteFileService, RemoteHandle};

/// Delete every handle, continuing past individual failures.
///
/// A leaked remote file is a resource leak, not a correctness hazard, so
/// reclamation favors deleting as much as possible over stopping at the
/// first error. Failures are logged and returned for the caller to count;
/// they never abort the run.
pub async fn cleanup(
    service: &dyn RemoteFileService,
    handles: &[RemoteHandle],
) -> Vec<AdscopeError> {
    let mut failures = Vec::new();
    for handle in handles {
        match service.delete(handle).await {
            Ok(()) => debug!("deleted remote file {}", handle.name),
            Err(err) => {
                warn!("could not delete remote file {}: {err}", handle.name);
                failures.push(err);
            }
        }
    }
    failures
}
