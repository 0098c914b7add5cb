//! FFmpeg Joiner - 基于 ffmpeg 的音频拼接与混音
//!
//! 实现 AudioJoinerPort trait：
//! - concat demuxer 无损拼接分段 MP3
//! - 背景音乐循环、裁剪、音量、渐出后与配音混合
//! - ffprobe 读取配音时长

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

use crate::application::ports::{AudioJoinError, AudioJoinerPort, MixRequest};

/// ffmpeg 配置
#[derive(Debug, Clone)]
pub struct FfmpegJoinerConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// 混音输出码率
    pub bitrate: String,
}

impl Default for FfmpegJoinerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            bitrate: "192k".to_string(),
        }
    }
}

/// ffmpeg 拼接/混音器
pub struct FfmpegJoiner {
    config: FfmpegJoinerConfig,
}

impl FfmpegJoiner {
    pub fn new(config: FfmpegJoinerConfig) -> Self {
        Self { config }
    }

    /// ffmpeg 是否可用
    pub async fn is_available(&self) -> bool {
        Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// 读取音频时长（秒）
    pub async fn probe_duration(&self, path: &Path) -> Result<f64, AudioJoinError> {
        let output = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| spawn_error(&self.config.ffprobe_path, e))?;

        if !output.status.success() {
            return Err(AudioJoinError::ProbeError(format!(
                "{}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn run_ffmpeg(&self, args: Vec<std::ffi::OsString>) -> Result<(), AudioJoinError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| spawn_error(&self.config.ffmpeg_path, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioJoinError::CommandFailed {
                tool: "ffmpeg".to_string(),
                message: last_lines(&stderr, 5),
            });
        }
        Ok(())
    }
}

fn spawn_error(tool: &str, err: std::io::Error) -> AudioJoinError {
    if err.kind() == std::io::ErrorKind::NotFound {
        AudioJoinError::ToolMissing(tool.to_string())
    } else {
        AudioJoinError::IoError(format!("{}: {}", tool, err))
    }
}

/// stderr 只保留最后几行
fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.trim().lines().collect();
    lines[lines.len().saturating_sub(count)..].join("\n")
}

fn parse_duration(stdout: &str) -> Result<f64, AudioJoinError> {
    let value = stdout.trim();
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(AudioJoinError::ProbeError(format!(
            "Invalid duration: {:?}",
            value
        ))),
    }
}

/// concat demuxer 列表文件内容
///
/// 路径中的单引号按 ffmpeg 规则转义为 `'\''`
pub fn build_concat_list(fragments: &[PathBuf]) -> String {
    fragments
        .iter()
        .map(|path| {
            let escaped = path.to_string_lossy().replace('\'', r"'\''");
            format!("file '{}'\n", escaped)
        })
        .collect()
}

/// 混音滤镜
///
/// 背景音乐无限循环后裁到配音时长，调整音量，在结尾 `fade_out_secs` 秒内渐出，
/// 再与配音混合，总时长以配音为准。
pub fn build_mix_filter(duration_secs: f64, volume: f32, fade_out_secs: f32) -> String {
    let fade = f64::from(fade_out_secs).min(duration_secs).max(0.0);
    let fade_start = (duration_secs - fade).max(0.0);

    format!(
        "[1:a]aloop=loop=-1:size=2e+09[bgm_loop];\
         [bgm_loop]atrim=0:{duration:.3}[bgm_trim];\
         [bgm_trim]volume={volume}[bgm_vol];\
         [bgm_vol]afade=t=out:st={start:.3}:d={fade:.3}[bgm_out];\
         [0:a][bgm_out]amix=inputs=2:duration=first:dropout_transition=2[outa]",
        duration = duration_secs,
        volume = volume,
        start = fade_start,
        fade = fade,
    )
}

#[async_trait]
impl AudioJoinerPort for FfmpegJoiner {
    async fn concatenate(&self, fragments: &[PathBuf], output: &Path) -> Result<(), AudioJoinError> {
        if fragments.is_empty() {
            return Err(AudioJoinError::NoFragments);
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AudioJoinError::IoError(e.to_string()))?;
        }

        // 列表文件放在第一个片段旁边，随片段目录一起清理
        let list_dir = fragments[0]
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let list_path = list_dir.join("concat_list.txt");

        let absolute: Vec<PathBuf> = fragments
            .iter()
            .map(|p| std::path::absolute(p).unwrap_or_else(|_| p.clone()))
            .collect();
        fs::write(&list_path, build_concat_list(&absolute))
            .await
            .map_err(|e| AudioJoinError::IoError(e.to_string()))?;

        let result = self
            .run_ffmpeg(vec![
                "-y".into(),
                "-f".into(),
                "concat".into(),
                "-safe".into(),
                "0".into(),
                "-i".into(),
                list_path.clone().into_os_string(),
                "-c".into(),
                "copy".into(),
                output.as_os_str().to_os_string(),
            ])
            .await;

        let _ = fs::remove_file(&list_path).await;

        if result.is_ok() {
            tracing::debug!(
                fragments = fragments.len(),
                output = %output.display(),
                "Concatenated audio fragments"
            );
        }
        result
    }

    async fn mix_with_background(&self, request: &MixRequest) -> Result<(), AudioJoinError> {
        let duration = self.probe_duration(&request.primary).await?;
        let filter = build_mix_filter(duration, request.volume, request.fade_out_secs);

        if let Some(parent) = request.output.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AudioJoinError::IoError(e.to_string()))?;
        }

        tracing::debug!(
            primary = %request.primary.display(),
            background = %request.background.display(),
            duration_secs = duration,
            "Mixing background music"
        );

        self.run_ffmpeg(vec![
            "-y".into(),
            "-i".into(),
            request.primary.clone().into_os_string(),
            "-i".into(),
            request.background.clone().into_os_string(),
            "-filter_complex".into(),
            filter.into(),
            "-map".into(),
            "[outa]".into(),
            "-c:a".into(),
            "libmp3lame".into(),
            "-b:a".into(),
            self.config.bitrate.clone().into(),
            request.output.clone().into_os_string(),
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_filter() {
        let filter = build_mix_filter(120.0, 0.3, 3.0);
        assert_eq!(
            filter,
            "[1:a]aloop=loop=-1:size=2e+09[bgm_loop];\
             [bgm_loop]atrim=0:120.000[bgm_trim];\
             [bgm_trim]volume=0.3[bgm_vol];\
             [bgm_vol]afade=t=out:st=117.000:d=3.000[bgm_out];\
             [0:a][bgm_out]amix=inputs=2:duration=first:dropout_transition=2[outa]"
        );
    }

    #[test]
    fn test_mix_filter_short_narration() {
        let filter = build_mix_filter(2.0, 0.5, 3.0);
        assert!(filter.contains("afade=t=out:st=0.000:d=2.000"));
        assert!(filter.contains("volume=0.5"));
    }

    #[test]
    fn test_concat_list_escapes_quotes() {
        let list = build_concat_list(&[
            PathBuf::from("/tmp/a/part001.mp3"),
            PathBuf::from("/tmp/it's/part002.mp3"),
        ]);
        assert_eq!(
            list,
            "file '/tmp/a/part001.mp3'\nfile '/tmp/it'\\''s/part002.mp3'\n"
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("12.5\n").unwrap(), 12.5);
        assert!(parse_duration("N/A").is_err());
        assert!(parse_duration("0").is_err());
    }

    #[test]
    fn test_last_lines() {
        assert_eq!(last_lines("a\nb\nc\n", 2), "b\nc");
        assert_eq!(last_lines("only", 5), "only");
    }

    #[tokio::test]
    async fn test_empty_fragment_list() {
        let joiner = FfmpegJoiner::new(FfmpegJoinerConfig::default());
        let result = joiner.concatenate(&[], Path::new("/tmp/out.mp3")).await;
        assert!(matches!(result, Err(AudioJoinError::NoFragments)));
    }

    #[tokio::test]
    async fn test_missing_tool_reported() {
        let joiner = FfmpegJoiner::new(FfmpegJoinerConfig {
            ffprobe_path: "definitely-not-a-real-ffprobe".to_string(),
            ..Default::default()
        });
        let result = joiner.probe_duration(Path::new("/tmp/none.mp3")).await;
        assert!(matches!(result, Err(AudioJoinError::ToolMissing(_))));
    }
}
