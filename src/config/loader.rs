//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（tingwen.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["tingwen", "tingwen.local"];

/// 加载应用配置（默认搜索路径）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TINGWEN_`，层级分隔符 `__`）
/// 2. 配置文件（`config_path`，或 tingwen.toml / tingwen.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TINGWEN_TTS__URL=http://tts-server:8000`
/// - `TINGWEN_PIPELINE__BATCH_SIZE=10`
/// - `TINGWEN_BGM__ENABLED=false`
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("tts.voice", "zh-CN-XiaoxiaoNeural")?
        .set_default("fetch.timeout_secs", 15)?
        .set_default("fetch.accept_invalid_certs", true)?
        .set_default("pipeline.segment_max_chars", 3000)?
        .set_default("pipeline.min_body_chars", 1)?
        .set_default("pipeline.delay_between_segments_ms", 0)?
        .set_default("pipeline.delay_between_articles_secs", 5)?
        .set_default("pipeline.batch_size", 5)?
        .set_default("pipeline.delay_between_batches_secs", 30)?
        .set_default("bgm.enabled", true)?
        .set_default("bgm.dir", "素材")?
        .set_default("bgm.volume", 0.3)?
        .set_default("bgm.fade_out_secs", 3.0)?
        .set_default("audio.ffmpeg_path", "ffmpeg")?
        .set_default("audio.ffprobe_path", "ffprobe")?
        .set_default("audio.bitrate", "192k")?
        .set_default("output.text_dir", "articles_for_review")?
        .set_default("output.voice_dir", "audio_output")?
        .set_default("output.final_dir", "audio_with_bgm")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如 TINGWEN_TTS__URL
    builder = builder.add_source(
        Environment::with_prefix("TINGWEN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tts.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.tts.voice.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS voice cannot be empty".to_string(),
        ));
    }

    if config.pipeline.segment_max_chars == 0 {
        return Err(ConfigError::ValidationError(
            "segment_max_chars must be greater than 0".to_string(),
        ));
    }

    if config.pipeline.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "batch_size must be greater than 0".to_string(),
        ));
    }

    if !(config.bgm.volume > 0.0 && config.bgm.volume <= 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "Background volume must be in (0, 1], got {}",
            config.bgm.volume
        )));
    }

    if config.bgm.fade_out_secs < 0.0 {
        return Err(ConfigError::ValidationError(
            "fade_out_secs cannot be negative".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("TTS URL: {}", config.tts.url);
    tracing::info!("TTS Voice: {}", config.tts.voice);
    tracing::info!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::info!("Fetch Timeout: {}s", config.fetch.timeout_secs);
    tracing::info!("Segment Max Chars: {}", config.pipeline.segment_max_chars);
    tracing::info!(
        "Batch: size={}, article delay={}s, batch delay={}s",
        config.pipeline.batch_size,
        config.pipeline.delay_between_articles_secs,
        config.pipeline.delay_between_batches_secs
    );
    tracing::info!("BGM Enabled: {}", config.bgm.enabled);
    if config.bgm.enabled {
        tracing::info!("BGM Directory: {:?}", config.bgm.dir);
        tracing::info!(
            "BGM Volume: {}, Fade Out: {}s",
            config.bgm.volume,
            config.bgm.fade_out_secs
        );
    }
    tracing::info!("Text Directory: {:?}", config.output.text_dir);
    tracing::info!("Voice Directory: {:?}", config.output.voice_dir);
    tracing::info!("Final Directory: {:?}", config.output.final_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_tts_url() {
        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_segment_size() {
        let mut config = AppConfig::default();
        config.pipeline.segment_max_chars = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_batch_size() {
        let mut config = AppConfig::default();
        config.pipeline.batch_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_volume_out_of_range() {
        let mut config = AppConfig::default();
        config.bgm.volume = 0.0;
        assert!(validate_config(&config).is_err());
        config.bgm.volume = 1.2;
        assert!(validate_config(&config).is_err());
        config.bgm.volume = 1.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[tts]
voice = "zh-CN-YunxiNeural"

[pipeline]
segment_max_chars = 1500

[bgm]
volume = 0.2
"#,
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.tts.voice, "zh-CN-YunxiNeural");
        assert_eq!(config.pipeline.segment_max_chars, 1500);
        assert!((config.bgm.volume - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.pipeline.batch_size, 5);
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "[pipeline]\nbatch_size = 0\n").unwrap();

        assert!(matches!(
            load_config_from_path(Some(&path)),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config_from_path(Some(Path::new("/nonexistent/tingwen.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
