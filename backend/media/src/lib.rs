pub mod dir;
pub mod sampler;
pub mod source;

pub use dir::prepare_frame_dir;
pub use sampler::{artifact_prefix, sample};
pub use source::{FfmpegSource, RawFrame, VideoSource};
