//! Video decoding via ffprobe/ffmpeg subprocesses.
//!
//! ffprobe supplies the stream metadata (frame rate, dimensions); ffmpeg
//! pipes decoded rgb24 rasters over stdout, one fixed-size buffer per frame.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tracing::debug;

use adscope_core::{AdscopeError, Result};

/// One decoded frame: packed RGB, `width * height * 3` bytes.
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// A sequentially decodable video with fixed frame-rate metadata.
///
/// Metadata is immutable for the duration of sampling; `next_frame` yields
/// frames in decode order until end of stream.
#[async_trait]
pub trait VideoSource: Send {
    /// Source frame rate in frames per second.
    fn frame_rate(&self) -> f64;

    /// Decode the next frame, or `None` at end of stream.
    async fn next_frame(&mut self) -> Result<Option<RawFrame>>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// ffmpeg-backed [`VideoSource`].
///
/// The decoder child is spawned with kill-on-drop, so the handle is released
/// on every exit path, including early errors mid-sampling.
pub struct FfmpegSource {
    path: PathBuf,
    fps: f64,
    width: u32,
    height: u32,
    child: Child,
    stdout: ChildStdout,
}

impl FfmpegSource {
    /// Probe `path` and start a sequential rgb24 decode.
    ///
    /// Fails with `UnsupportedSource` when the container has no video stream
    /// or its frame rate is missing or non-positive, before any frame is
    /// read and before any remote call is made.
    pub async fn open(path: &Path) -> Result<Self> {
        let (fps, width, height) = probe(path).await?;

        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AdscopeError::io(path, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AdscopeError::UnsupportedSource("ffmpeg stdout unavailable".into()))?;

        debug!(
            "decoding {} at {fps} fps, {width}x{height}",
            path.display()
        );
        Ok(Self {
            path: path.to_path_buf(),
            fps,
            width,
            height,
            child,
            stdout,
        })
    }
}

#[async_trait]
impl VideoSource for FfmpegSource {
    fn frame_rate(&self) -> f64 {
        self.fps
    }

    async fn next_frame(&mut self) -> Result<Option<RawFrame>> {
        let frame_size = self.width as usize * self.height as usize * 3;
        let mut data = vec![0u8; frame_size];
        match self.stdout.read_exact(&mut data).await {
            Ok(_) => Ok(Some(RawFrame {
                width: self.width,
                height: self.height,
                data,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                // End of stream; reap the decoder so it does not linger.
                let _ = self.child.wait().await;
                Ok(None)
            }
            Err(e) => Err(AdscopeError::io(&self.path, e)),
        }
    }
}

/// Run ffprobe and extract `(fps, width, height)` of the first video stream.
async fn probe(path: &Path) -> Result<(f64, u32, u32)> {
    let output = Command::new("ffprobe")
        .args(["-v", "quiet", "-print_format", "json", "-show_streams"])
        .arg(path)
        .output()
        .await
        .map_err(|e| AdscopeError::io(path, e))?;

    if !output.status.success() {
        return Err(AdscopeError::UnsupportedSource(format!(
            "ffprobe could not read {}",
            path.display()
        )));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)
        .map_err(|e| AdscopeError::UnsupportedSource(format!("ffprobe output: {e}")))?;

    let stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            AdscopeError::UnsupportedSource(format!("no video stream in {}", path.display()))
        })?;

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_frame_rate)
        .ok_or_else(|| {
            AdscopeError::UnsupportedSource(format!(
                "no usable frame rate in {}",
                path.display()
            ))
        })?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(AdscopeError::UnsupportedSource(format!(
                "missing dimensions in {}",
                path.display()
            )))
        }
    };

    Ok((fps, width, height))
}

/// Parse ffprobe's rational frame rate (`30/1`, `30000/1001`) or a plain
/// float. Returns `None` for zero, negative, or malformed rates.
fn parse_frame_rate(rate: &str) -> Option<f64> {
    let fps = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}
