//! Article Commands - 文章处理命令

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::article::ArticleRow;
use crate::domain::text::{DEFAULT_MAX_CHARS, DEFAULT_MIN_BODY_CHARS};

/// 背景音乐混音参数
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundOptions {
    /// 背景音乐音量比例
    pub volume: f32,
    /// 结尾渐出时长（秒）
    pub fade_out_secs: f32,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            volume: 0.3,
            fade_out_secs: 3.0,
        }
    }
}

/// 正文清理参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    /// 最少正文字符数
    pub min_body_chars: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            min_body_chars: DEFAULT_MIN_BODY_CHARS,
        }
    }
}

/// 单篇转换参数（每次调用显式传入）
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// TTS 语音
    pub voice: String,
    /// 单段最大字符数
    pub segment_max_chars: usize,
    /// 片段之间的合成间隔
    pub segment_delay: Duration,
    pub clean: CleanOptions,
    /// 为空时不混背景音乐
    pub background: Option<BackgroundOptions>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            voice: "zh-CN-XiaoxiaoNeural".to_string(),
            segment_max_chars: DEFAULT_MAX_CHARS,
            segment_delay: Duration::ZERO,
            clean: CleanOptions::default(),
            background: Some(BackgroundOptions::default()),
        }
    }
}

/// 抓取并保存正文命令
#[derive(Debug, Clone)]
pub struct FetchArticleText {
    pub row: ArticleRow,
    pub clean: CleanOptions,
}

/// 抓取正文响应
#[derive(Debug, Clone)]
pub struct FetchArticleTextResponse {
    pub text: String,
    pub text_path: PathBuf,
    pub tail_marker: Option<String>,
}

/// 文章转音频命令
#[derive(Debug, Clone)]
pub struct ConvertArticle {
    pub row: ArticleRow,
    pub options: ConvertOptions,
}

/// 混音结果
#[derive(Debug, Clone, PartialEq)]
pub enum MixOutcome {
    /// 已混音
    Mixed { output: PathBuf, background: PathBuf },
    /// 没有可用的背景音乐
    NoBackground,
    /// 未启用
    Disabled,
    /// 混音失败，保留纯配音
    Failed(String),
}

/// 文章转音频响应
#[derive(Debug, Clone)]
pub struct ConvertArticleResponse {
    pub seq: u32,
    pub text_chars: usize,
    pub segments: usize,
    pub voice_path: PathBuf,
    pub mix: MixOutcome,
}

/// 配音混音命令
#[derive(Debug, Clone)]
pub struct MixNarration {
    pub voice_path: PathBuf,
    pub options: BackgroundOptions,
}
