//! Fixed-cadence frame sampling: two stills per second of footage.

use std::path::Path;

use image::RgbImage;
use tracing::{info, warn};

use adscope_core::{sample_timestamp, AdscopeError, Artifact, Result};

use crate::dir::prepare_frame_dir;
use crate::source::{RawFrame, VideoSource};

/// Derive the artifact name prefix from the source file name: the base name
/// with every dot replaced by an underscore.
pub fn artifact_prefix(video_path: &Path) -> String {
    video_path
        .file_name()
        .map(|n| n.to_string_lossy().replace('.', "_"))
        .unwrap_or_default()
}

/// Sample `source` at the fixed 0.5s cadence into `output_dir`.
///
/// The output directory is prepared (emptied) first. Every decoded frame
/// advances the decode counter; a frame is persisted when its cadence bucket
/// matches the next sample index. Artifacts come back in emission order,
/// which equals lexical filename order given the zero-padded timestamps.
///
/// Naming quirk, preserved from the reference scheme: timestamps truncate to
/// whole seconds, so each pair of consecutive samples shares a filename and
/// the later write overwrites the earlier file. A `warn` is logged whenever
/// that happens.
///
/// Sources slower than 2 fps alias: the cadence skips buckets it cannot
/// fill, an accepted approximation.
pub async fn sample(
    source: &mut dyn VideoSource,
    output_dir: &Path,
    name_prefix: &str,
    frame_tag: &str,
) -> Result<Vec<Artifact>> {
    prepare_frame_dir(output_dir)?;

    let fps = source.frame_rate();
    if !fps.is_finite() || fps <= 0.0 {
        return Err(AdscopeError::UnsupportedSource(format!(
            "frame rate {fps} cannot drive the sampling cadence"
        )));
    }
    let sampling_period_frames = fps / 2.0;

    let mut artifacts = Vec::new();
    let mut count: u64 = 0;
    let mut frame_count: u32 = 0;
    let mut last_name: Option<String> = None;

    while let Some(frame) = source.next_frame().await? {
        let bucket = (count as f64 / sampling_period_frames) as u64;
        if bucket == u64::from(frame_count) {
            let timestamp = sample_timestamp(frame_count);
            let file_name = format!("{name_prefix}{frame_tag}{timestamp}.jpg");
            if last_name.as_deref() == Some(file_name.as_str()) {
                warn!("timestamp truncation reuses {file_name}; previous sample overwritten");
            }
            let path = output_dir.join(&file_name);
            write_jpeg(frame, &path)?;
            artifacts.push(Artifact {
                path,
                sample_index: frame_count,
                timestamp,
            });
            last_name = Some(file_name);
            frame_count += 1;
        }
        count += 1;
    }

    info!(
        "sampled {} stills from {} decoded frames into {}",
        artifacts.len(),
        count,
        output_dir.display()
    );
    Ok(artifacts)
}

fn write_jpeg(frame: RawFrame, path: &Path) -> Result<()> {
    let image = RgbImage::from_raw(frame.width, frame.height, frame.data).ok_or_else(|| {
        AdscopeError::UnsupportedSource(format!(
            "frame buffer does not match {}x{} rgb24",
            frame.width, frame.height
        ))
    })?;
    image.save(path).map_err(|e| match e {
        image::ImageError::IoError(io) => AdscopeError::io(path, io),
        other => AdscopeError::UnsupportedSource(other.to_string()),
    })
}
