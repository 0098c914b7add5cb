//! Audio Joiner Port - 音频拼接与混音抽象

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 拼接/混音错误
#[derive(Debug, Error)]
pub enum AudioJoinError {
    #[error("Tool not found: {0}")]
    ToolMissing(String),

    #[error("{tool} failed: {message}")]
    CommandFailed { tool: String, message: String },

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("No audio fragments to join")]
    NoFragments,
}

/// 混音请求
#[derive(Debug, Clone, PartialEq)]
pub struct MixRequest {
    /// 配音
    pub primary: PathBuf,
    /// 背景音乐（循环铺满配音时长）
    pub background: PathBuf,
    /// 输出文件
    pub output: PathBuf,
    /// 背景音乐音量比例 (0, 1]
    pub volume: f32,
    /// 结尾渐出时长（秒）
    pub fade_out_secs: f32,
}

/// Audio Joiner Port
#[async_trait]
pub trait AudioJoinerPort: Send + Sync {
    /// 按顺序无损拼接音频片段
    async fn concatenate(&self, fragments: &[PathBuf], output: &Path) -> Result<(), AudioJoinError>;

    /// 在配音下叠加背景音乐
    async fn mix_with_background(&self, request: &MixRequest) -> Result<(), AudioJoinError>;
}
