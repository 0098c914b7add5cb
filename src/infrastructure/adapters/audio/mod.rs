//! Audio Adapter - ffmpeg 拼接与混音

mod ffmpeg_joiner;

pub use ffmpeg_joiner::{build_concat_list, build_mix_filter, FfmpegJoiner, FfmpegJoinerConfig};
