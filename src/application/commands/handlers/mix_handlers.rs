//! Mix Handlers - 配音叠加背景音乐

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::commands::article_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{AudioJoinerPort, MixRequest, OutputStoragePort};

/// 为配音选择背景音乐
///
/// 以配音文件名的 md5 对曲目数取模，同一篇文章每次都得到同一首。
pub fn pick_background<'a>(voice_path: &Path, tracks: &'a [PathBuf]) -> Option<&'a PathBuf> {
    if tracks.is_empty() {
        return None;
    }
    let stem = voice_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let digest = md5::compute(stem.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.0[..8]);
    let index = (u64::from_be_bytes(prefix) % tracks.len() as u64) as usize;
    tracks.get(index)
}

/// MixNarration Handler
pub struct MixNarrationHandler {
    joiner: Arc<dyn AudioJoinerPort>,
    storage: Arc<dyn OutputStoragePort>,
}

impl MixNarrationHandler {
    pub fn new(joiner: Arc<dyn AudioJoinerPort>, storage: Arc<dyn OutputStoragePort>) -> Self {
        Self { joiner, storage }
    }

    pub async fn handle(&self, cmd: MixNarration) -> Result<MixOutcome, ApplicationError> {
        let volume = cmd.options.volume;
        if !(volume > 0.0 && volume <= 1.0) {
            return Err(ApplicationError::validation(format!(
                "Background volume must be in (0, 1], got {}",
                volume
            )));
        }
        if !cmd.voice_path.exists() {
            return Err(ApplicationError::MixFailure(format!(
                "Narration not found: {}",
                cmd.voice_path.display()
            )));
        }

        let tracks = self.storage.list_background_tracks().await?;
        let Some(background) = pick_background(&cmd.voice_path, &tracks) else {
            tracing::warn!(voice = %cmd.voice_path.display(), "No background tracks available, keeping narration only");
            return Ok(MixOutcome::NoBackground);
        };

        let output = self.storage.final_path(&cmd.voice_path, background);
        let request = MixRequest {
            primary: cmd.voice_path.clone(),
            background: background.clone(),
            output: output.clone(),
            volume,
            fade_out_secs: cmd.options.fade_out_secs.max(0.0),
        };

        if let Err(err) = self.joiner.mix_with_background(&request).await {
            // 不留下不完整的混音文件
            if let Err(cleanup) = self.storage.remove_file(&output).await {
                tracing::warn!(output = %output.display(), error = %cleanup, "Failed to remove partial mix");
            }
            return Err(ApplicationError::MixFailure(err.to_string()));
        }

        tracing::info!(
            output = %output.display(),
            background = %background.display(),
            "Background music mixed"
        );

        Ok(MixOutcome::Mixed {
            output,
            background: background.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::commands::handlers::test_support::RecordingJoiner;
    use crate::infrastructure::adapters::storage::{FileOutputStorage, OutputLayout};
    use tempfile::tempdir;

    async fn setup(
        root: &Path,
        joiner: Arc<RecordingJoiner>,
        tracks: &[&str],
    ) -> (MixNarrationHandler, OutputLayout, PathBuf) {
        let layout = OutputLayout::under(root);
        let storage = FileOutputStorage::new(layout.clone()).await.unwrap();

        std::fs::create_dir_all(&layout.bgm_dir).unwrap();
        for track in tracks {
            std::fs::write(layout.bgm_dir.join(track), b"bgm").unwrap();
        }
        let voice = layout.voice_dir.join("001_标题.mp3");
        std::fs::write(&voice, b"voice").unwrap();

        (MixNarrationHandler::new(joiner, Arc::new(storage)), layout, voice)
    }

    #[test]
    fn test_pick_background_is_deterministic() {
        let tracks = vec![
            PathBuf::from("/bgm/a.mp3"),
            PathBuf::from("/bgm/b.mp3"),
            PathBuf::from("/bgm/c.mp3"),
        ];
        let voice = Path::new("/out/001_标题.mp3");

        let first = pick_background(voice, &tracks).unwrap();
        assert_eq!(pick_background(voice, &tracks).unwrap(), first);
        assert!(tracks.contains(first));
        assert!(pick_background(voice, &[]).is_none());
    }

    #[tokio::test]
    async fn test_mix_writes_final_output() {
        let temp_dir = tempdir().unwrap();
        let joiner = Arc::new(RecordingJoiner::default());
        let (handler, layout, voice) = setup(temp_dir.path(), joiner.clone(), &["轻音乐.mp3"]).await;

        let outcome = handler
            .handle(MixNarration {
                voice_path: voice.clone(),
                options: BackgroundOptions::default(),
            })
            .await
            .unwrap();

        let expected = layout.final_dir.join("001_标题_with_bgm_轻音乐.mp3");
        assert_eq!(
            outcome,
            MixOutcome::Mixed {
                output: expected.clone(),
                background: layout.bgm_dir.join("轻音乐.mp3"),
            }
        );
        let mixes = joiner.mixes();
        assert_eq!(mixes.len(), 1);
        assert_eq!(mixes[0].primary, voice);
        assert_eq!(mixes[0].volume, 0.3);
        assert_eq!(mixes[0].fade_out_secs, 3.0);
        assert!(expected.exists());
    }

    #[tokio::test]
    async fn test_no_background_tracks() {
        let temp_dir = tempdir().unwrap();
        let joiner = Arc::new(RecordingJoiner::default());
        let (handler, _, voice) = setup(temp_dir.path(), joiner.clone(), &[]).await;

        let outcome = handler
            .handle(MixNarration {
                voice_path: voice,
                options: BackgroundOptions::default(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, MixOutcome::NoBackground);
        assert!(joiner.mixes().is_empty());
    }

    #[tokio::test]
    async fn test_mix_failure_removes_partial_output() {
        let temp_dir = tempdir().unwrap();
        let joiner = Arc::new(RecordingJoiner::failing_mix());
        let (handler, layout, voice) = setup(temp_dir.path(), joiner, &["a.mp3"]).await;

        let result = handler
            .handle(MixNarration {
                voice_path: voice.clone(),
                options: BackgroundOptions::default(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::MixFailure(_))));
        assert!(!layout.final_dir.join("001_标题_with_bgm_a.mp3").exists());
        assert!(voice.exists());
    }

    #[tokio::test]
    async fn test_invalid_volume_rejected() {
        let temp_dir = tempdir().unwrap();
        let joiner = Arc::new(RecordingJoiner::default());
        let (handler, _, voice) = setup(temp_dir.path(), joiner, &["a.mp3"]).await;

        let result = handler
            .handle(MixNarration {
                voice_path: voice,
                options: BackgroundOptions {
                    volume: 1.5,
                    fade_out_secs: 3.0,
                },
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }
}
