//! Convert Handlers - 单篇文章转音频
//!
//! 流程：抓取清理正文 -> 分段 -> 逐段合成 -> 拼接 -> 叠加背景音乐

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::mix_handlers::MixNarrationHandler;
use super::text_handlers::FetchArticleTextHandler;
use crate::application::commands::article_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ArticleFetcherPort, AudioJoinerPort, InferRequest, OutputStoragePort, TtsEnginePort,
};
use crate::domain::article::ArticleRow;
use crate::domain::text::{segment_text, SegmentConfig};

/// ConvertArticle Handler
pub struct ConvertArticleHandler {
    text_handler: FetchArticleTextHandler,
    mix_handler: MixNarrationHandler,
    tts: Arc<dyn TtsEnginePort>,
    joiner: Arc<dyn AudioJoinerPort>,
    storage: Arc<dyn OutputStoragePort>,
}

impl ConvertArticleHandler {
    pub fn new(
        fetcher: Arc<dyn ArticleFetcherPort>,
        tts: Arc<dyn TtsEnginePort>,
        joiner: Arc<dyn AudioJoinerPort>,
        storage: Arc<dyn OutputStoragePort>,
    ) -> Self {
        Self {
            text_handler: FetchArticleTextHandler::new(fetcher, storage.clone()),
            mix_handler: MixNarrationHandler::new(joiner.clone(), storage.clone()),
            tts,
            joiner,
            storage,
        }
    }

    pub async fn handle(&self, cmd: ConvertArticle) -> Result<ConvertArticleResponse, ApplicationError> {
        let ConvertArticle { row, options } = cmd;

        if options.segment_max_chars == 0 {
            return Err(ApplicationError::validation("segment_max_chars must be > 0"));
        }

        let fetched = self
            .text_handler
            .handle(FetchArticleText {
                row: row.clone(),
                clean: options.clean.clone(),
            })
            .await?;

        let segments = segment_text(
            &fetched.text,
            &SegmentConfig {
                max_chars: options.segment_max_chars,
            },
        );
        if segments.is_empty() {
            return Err(ApplicationError::EmptyAfterClean);
        }

        tracing::info!(
            seq = row.seq,
            text_chars = fetched.text.chars().count(),
            segments = segments.len(),
            "Synthesizing article"
        );

        let voice_path = self.synthesize(&row, &segments, &options).await?;

        let mix = match &options.background {
            None => MixOutcome::Disabled,
            Some(background) => match self
                .mix_handler
                .handle(MixNarration {
                    voice_path: voice_path.clone(),
                    options: background.clone(),
                })
                .await
            {
                Ok(outcome) => outcome,
                Err(err) => {
                    // 混音失败不影响配音结果
                    tracing::warn!(seq = row.seq, error = %err, "Mix failed, narration kept");
                    MixOutcome::Failed(err.to_string())
                }
            },
        };

        Ok(ConvertArticleResponse {
            seq: row.seq,
            text_chars: fetched.text.chars().count(),
            segments: segments.len(),
            voice_path,
            mix,
        })
    }

    /// 合成整篇配音
    ///
    /// 失败时不留下任何配音文件或分段文件。
    async fn synthesize(
        &self,
        row: &ArticleRow,
        segments: &[String],
        options: &ConvertOptions,
    ) -> Result<PathBuf, ApplicationError> {
        let voice_path = self.storage.voice_path(row);

        let result = if segments.len() == 1 {
            self.synthesize_single(&segments[0], &voice_path, options).await
        } else {
            self.synthesize_fragments(row, segments, &voice_path, options).await
        };

        if let Err(err) = &result {
            tracing::warn!(seq = row.seq, error = %err, "Synthesis failed");
            if let Err(cleanup) = self.storage.remove_file(&voice_path).await {
                tracing::warn!(path = %voice_path.display(), error = %cleanup, "Failed to remove partial narration");
            }
        }

        result.map(|_| voice_path)
    }

    async fn synthesize_single(
        &self,
        text: &str,
        voice_path: &Path,
        options: &ConvertOptions,
    ) -> Result<(), ApplicationError> {
        let response = self
            .tts
            .infer(InferRequest {
                text: text.to_string(),
                voice: options.voice.clone(),
            })
            .await?;

        self.storage
            .write_audio(voice_path, &response.audio_data)
            .await?;
        Ok(())
    }

    async fn synthesize_fragments(
        &self,
        row: &ArticleRow,
        segments: &[String],
        voice_path: &Path,
        options: &ConvertOptions,
    ) -> Result<(), ApplicationError> {
        let fragment_dir = self.storage.create_fragment_dir(row).await?;

        let result = async {
            let mut fragments = Vec::with_capacity(segments.len());

            for (i, segment) in segments.iter().enumerate() {
                if i > 0 && !options.segment_delay.is_zero() {
                    tokio::time::sleep(options.segment_delay).await;
                }

                tracing::debug!(
                    seq = row.seq,
                    part = i + 1,
                    total = segments.len(),
                    chars = segment.chars().count(),
                    "Synthesizing segment"
                );

                let response = self
                    .tts
                    .infer(InferRequest {
                        text: segment.clone(),
                        voice: options.voice.clone(),
                    })
                    .await?;

                let fragment = fragment_dir.join(format!("part{:03}.mp3", i + 1));
                self.storage
                    .write_audio(&fragment, &response.audio_data)
                    .await?;
                fragments.push(fragment);
            }

            self.joiner
                .concatenate(&fragments, voice_path)
                .await
                .map_err(|e| ApplicationError::SynthesisFailure(e.to_string()))
        }
        .await;

        if let Err(cleanup) = self.storage.remove_dir(&fragment_dir).await {
            tracing::warn!(dir = %fragment_dir.display(), error = %cleanup, "Failed to remove fragment directory");
        }

        result
    }
}
