//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 文章抓取配置
    #[serde(default)]
    pub fetch: FetchConfig,

    /// 处理流程配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 背景音乐配置
    #[serde(default)]
    pub bgm: BgmConfig,

    /// 音频工具配置
    #[serde(default)]
    pub audio: AudioConfig,

    /// 输出目录配置
    #[serde(default)]
    pub output: OutputConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 语音名称
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_voice() -> String {
    "zh-CN-XiaoxiaoNeural".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            voice: default_voice(),
        }
    }
}

/// 文章抓取配置
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// 是否接受无效 TLS 证书
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            user_agent: default_user_agent(),
            accept_invalid_certs: true,
        }
    }
}

/// 处理流程配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 单段最大字符数
    #[serde(default = "default_segment_max_chars")]
    pub segment_max_chars: usize,

    /// 最少正文字符数
    #[serde(default = "default_min_body_chars")]
    pub min_body_chars: usize,

    /// 片段合成间隔（毫秒）
    #[serde(default)]
    pub delay_between_segments_ms: u64,

    /// 文章间隔（秒）
    #[serde(default = "default_article_delay")]
    pub delay_between_articles_secs: u64,

    /// 每批文章数
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// 批次间隔（秒）
    #[serde(default = "default_batch_delay")]
    pub delay_between_batches_secs: u64,
}

fn default_segment_max_chars() -> usize {
    3000
}

fn default_min_body_chars() -> usize {
    1
}

fn default_article_delay() -> u64 {
    5
}

fn default_batch_size() -> usize {
    5
}

fn default_batch_delay() -> u64 {
    30
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            segment_max_chars: default_segment_max_chars(),
            min_body_chars: default_min_body_chars(),
            delay_between_segments_ms: 0,
            delay_between_articles_secs: default_article_delay(),
            batch_size: default_batch_size(),
            delay_between_batches_secs: default_batch_delay(),
        }
    }
}

impl PipelineConfig {
    pub fn segment_delay(&self) -> Duration {
        Duration::from_millis(self.delay_between_segments_ms)
    }

    pub fn article_delay(&self) -> Duration {
        Duration::from_secs(self.delay_between_articles_secs)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.delay_between_batches_secs)
    }
}

/// 背景音乐配置
#[derive(Debug, Clone, Deserialize)]
pub struct BgmConfig {
    /// 是否混入背景音乐
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// 背景音乐目录
    #[serde(default = "default_bgm_dir")]
    pub dir: PathBuf,

    /// 音量比例 (0, 1]
    #[serde(default = "default_bgm_volume")]
    pub volume: f32,

    /// 结尾渐出时长（秒）
    #[serde(default = "default_fade_out")]
    pub fade_out_secs: f32,
}

fn default_bgm_dir() -> PathBuf {
    PathBuf::from("素材")
}

fn default_bgm_volume() -> f32 {
    0.3
}

fn default_fade_out() -> f32 {
    3.0
}

impl Default for BgmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_bgm_dir(),
            volume: default_bgm_volume(),
            fade_out_secs: default_fade_out(),
        }
    }
}

/// 音频工具配置
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,

    /// 混音输出码率
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_bitrate() -> String {
    "192k".to_string()
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
            bitrate: default_bitrate(),
        }
    }
}

/// 输出目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// 清理后的正文（供人工核对）
    #[serde(default = "default_text_dir")]
    pub text_dir: PathBuf,

    /// 纯配音
    #[serde(default = "default_voice_dir")]
    pub voice_dir: PathBuf,

    /// 混音输出
    #[serde(default = "default_final_dir")]
    pub final_dir: PathBuf,
}

fn default_text_dir() -> PathBuf {
    PathBuf::from("articles_for_review")
}

fn default_voice_dir() -> PathBuf {
    PathBuf::from("audio_output")
}

fn default_final_dir() -> PathBuf {
    PathBuf::from("audio_with_bgm")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            text_dir: default_text_dir(),
            voice_dir: default_voice_dir(),
            final_dir: default_final_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
