//! End-to-end analysis run: sample stills, upload them in order, issue one
//! generation request, reclaim the remote files on every exit path.

pub mod assemble;
pub mod cleanup;
pub mod context;
pub mod upload;

use std::time::Duration;

use tracing::{info, warn};

use adscope_core::{RemoteFileService, RemoteHandle, Result};
use adscope_media::VideoSource;

pub use assemble::{build_and_send, build_request, ANALYSIS_PROMPT};
pub use cleanup::cleanup;
pub use context::RunContext;
pub use upload::{upload_all, UploadedArtifact};

/// Run one full analysis pass and return the generated report text.
///
/// Stages run strictly in sequence: sample into the run's frame directory,
/// upload the artifacts lexically ordered, send the multi-part generation
/// request, then delete every uploaded handle. Cleanup happens whether or
/// not generation succeeded; a generation error propagates only after the
/// handles have been reclaimed best-effort.
pub async fn run(
    ctx: &RunContext,
    source: &mut dyn VideoSource,
    service: &dyn RemoteFileService,
    generation_timeout: Duration,
) -> Result<String> {
    let artifacts =
        adscope_media::sample(source, &ctx.frames_dir, &ctx.name_prefix, &ctx.frame_tag).await?;
    info!(
        "sampled {} stills into {}",
        artifacts.len(),
        ctx.frames_dir.display()
    );

    let uploaded = upload_all(&ctx.frames_dir, service).await?;
    let handles: Vec<RemoteHandle> = uploaded.iter().map(|u| u.handle.clone()).collect();

    // acquire/release pair: handles are reclaimed on both outcomes
    let outcome = build_and_send(ANALYSIS_PROMPT, &handles, service, generation_timeout).await;
    let failures = cleanup(service, &handles).await;
    if !failures.is_empty() {
        warn!("{} remote artifacts were not reclaimed", failures.len());
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use adscope_core::{AdscopeError, RequestPart};
    use adscope_media::RawFrame;

    /// Records every remote call in order; failure points are injectable.
    struct MockService {
        log: Mutex<Vec<String>>,
        fail_upload_of: Option<String>,
        fail_generate: bool,
        fail_delete_of: Vec<String>,
    }

    impl MockService {
        fn new() -> Self {
            Self {
                log: Mutex::new(Vec::new()),
                fail_upload_of: None,
                fail_generate: false,
                fail_delete_of: Vec::new(),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RemoteFileService for MockService {
        async fn upload(&self, path: &Path) -> adscope_core::Result<RemoteHandle> {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.log.lock().unwrap().push(format!("upload {name}"));
            if self.fail_upload_of.as_deref() == Some(name.as_str()) {
                return Err(AdscopeError::Upload {
                    artifact: name,
                    message: "injected".into(),
                });
            }
            Ok(RemoteHandle {
                name: format!("files/{name}"),
                uri: format!("https://files.example/{name}"),
                mime_type: "image/jpeg".into(),
            })
        }

        async fn generate(
            &self,
            parts: &[RequestPart],
            _timeout: Duration,
        ) -> adscope_core::Result<String> {
            self.log
                .lock()
                .unwrap()
                .push(format!("generate {}", parts.len()));
            if self.fail_generate {
                return Err(AdscopeError::Generation("injected".into()));
            }
            Ok("analysis report".into())
        }

        async fn delete(&self, handle: &RemoteHandle) -> adscope_core::Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("delete {}", handle.name));
            if self.fail_delete_of.contains(&handle.name) {
                return Err(AdscopeError::Delete {
                    handle: handle.name.clone(),
                    message: "injected".into(),
                });
            }
            Ok(())
        }
    }

    /// Solid-color frames at a declared rate, for driving the sampler.
    struct SyntheticSource {
        fps: f64,
        total: u64,
        emitted: u64,
    }

    #[async_trait]
    impl adscope_media::VideoSource for SyntheticSource {
        fn frame_rate(&self) -> f64 {
            self.fps
        }

        async fn next_frame(&mut self) -> adscope_core::Result<Option<RawFrame>> {
            if self.emitted >= self.total {
                return Ok(None);
            }
            let shade = (self.emitted % 256) as u8;
            self.emitted += 1;
            Ok(Some(RawFrame {
                width: 4,
                height: 4,
                data: vec![shade; 4 * 4 * 3],
            }))
        }
    }

    fn seed_files(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"jpeg-bytes").unwrap();
        }
    }

    #[tokio::test]
    async fn uploads_follow_lexical_filename_order() {
        let dir = tempfile::tempdir().unwrap();
        seed_files(dir.path(), &["b_frame00:00.jpg", "a_frame00:00.jpg", "c_frame00:00.jpg"]);
        let service = MockService::new();

        let uploaded = upload_all(dir.path(), &service).await.unwrap();

        let names: Vec<String> = uploaded
            .iter()
            .map(|u| u.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["a_frame00:00.jpg", "b_frame00:00.jpg", "c_frame00:00.jpg"]
        );
        assert_eq!(uploaded[0].handle.name, "files/a_frame00:00.jpg");
    }

    #[tokio::test]
    async fn upload_failure_rolls_back_and_skips_generation() {
        let dir = tempfile::tempdir().unwrap();
        seed_files(dir.path(), &["a.jpg", "b.jpg", "c.jpg"]);
        let mut service = MockService::new();
        service.fail_upload_of = Some("b.jpg".into());

        let result = upload_all(dir.path(), &service).await;
        assert!(matches!(result, Err(AdscopeError::Upload { .. })));

        let calls = service.calls();
        assert_eq!(
            calls,
            vec!["upload a.jpg", "upload b.jpg", "delete files/a.jpg"]
        );
        assert!(!calls.iter().any(|c| c.starts_with("generate")));
    }

    #[tokio::test]
    async fn cleanup_continues_past_a_failed_delete() {
        let handles: Vec<RemoteHandle> = ["files/a", "files/b", "files/c"]
            .iter()
            .map(|n| RemoteHandle {
                name: n.to_string(),
                uri: format!("uri-{n}"),
                mime_type: "image/jpeg".into(),
            })
            .collect();
        let mut service = MockService::new();
        service.fail_delete_of = vec!["files/a".into()];

        let failures = cleanup(&service, &handles).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(
            service.calls(),
            vec!["delete files/a", "delete files/b", "delete files/c"]
        );
    }

    #[tokio::test]
    async fn run_yields_report_and_reclaims_handles() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext::for_video(Path::new("ad.mp4"), dir.path().join("frames"));
        let mut source = SyntheticSource {
            fps: 10.0,
            total: 30,
            emitted: 0,
        };
        let service = MockService::new();

        let text = run(&ctx, &mut source, &service, Duration::from_secs(600))
            .await
            .unwrap();
        assert_eq!(text, "analysis report");

        // 6 samples collapse to 3 files on disk (timestamp truncation)
        let calls = service.calls();
        assert_eq!(calls.iter().filter(|c| c.starts_with("upload")).count(), 3);
        assert!(calls.contains(&"generate 4".to_string()));
        assert_eq!(calls.iter().filter(|c| c.starts_with("delete")).count(), 3);
    }

    #[tokio::test]
    async fn run_reclaims_handles_when_generation_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = RunContext::for_video(Path::new("ad.mp4"), dir.path().join("frames"));
        let mut source = SyntheticSource {
            fps: 10.0,
            total: 30,
            emitted: 0,
        };
        let mut service = MockService::new();
        service.fail_generate = true;

        let result = run(&ctx, &mut source, &service, Duration::from_secs(600)).await;
        assert!(matches!(result, Err(AdscopeError::Generation(_))));

        let calls = service.calls();
        let generate_at = calls.iter().position(|c| c.starts_with("generate")).unwrap();
        let deletes: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with("delete"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(deletes.len(), 3);
        assert!(deletes.iter().all(|&i| i > generate_at));
    }
}
