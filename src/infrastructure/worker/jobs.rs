//! Batch Jobs - 各子命令的单项任务

use async_trait::async_trait;
use std::path::PathBuf;

use super::batch_worker::BatchJob;
use crate::application::commands::handlers::{
    ConvertArticleHandler, FetchArticleTextHandler, MixNarrationHandler,
};
use crate::application::commands::{
    BackgroundOptions, CleanOptions, ConvertArticle, ConvertOptions, FetchArticleText, MixNarration,
    MixOutcome,
};
use crate::application::error::ApplicationError;
use crate::domain::article::ArticleRow;

/// 文章转音频
pub struct ConvertJob {
    pub handler: ConvertArticleHandler,
    pub options: ConvertOptions,
}

#[async_trait]
impl BatchJob<ArticleRow> for ConvertJob {
    fn describe(&self, item: &ArticleRow) -> String {
        item.to_string()
    }

    async fn process(&self, item: &ArticleRow) -> Result<(), ApplicationError> {
        let response = self
            .handler
            .handle(ConvertArticle {
                row: item.clone(),
                options: self.options.clone(),
            })
            .await?;

        let final_output = match &response.mix {
            MixOutcome::Mixed { output, .. } => Some(output.display().to_string()),
            _ => None,
        };

        tracing::info!(
            seq = response.seq,
            text_chars = response.text_chars,
            segments = response.segments,
            voice = %response.voice_path.display(),
            final_output = ?final_output,
            "Article converted"
        );
        Ok(())
    }
}

/// 仅抓取正文
pub struct FetchJob {
    pub handler: FetchArticleTextHandler,
    pub clean: CleanOptions,
}

#[async_trait]
impl BatchJob<ArticleRow> for FetchJob {
    fn describe(&self, item: &ArticleRow) -> String {
        item.to_string()
    }

    async fn process(&self, item: &ArticleRow) -> Result<(), ApplicationError> {
        let response = self
            .handler
            .handle(FetchArticleText {
                row: item.clone(),
                clean: self.clean.clone(),
            })
            .await?;

        tracing::info!(
            seq = item.seq,
            chars = response.text.chars().count(),
            path = %response.text_path.display(),
            "Article text saved"
        );
        Ok(())
    }
}

/// 为已有配音混音
pub struct MixJob {
    pub handler: MixNarrationHandler,
    pub options: BackgroundOptions,
}

#[async_trait]
impl BatchJob<PathBuf> for MixJob {
    fn describe(&self, item: &PathBuf) -> String {
        item.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.display().to_string())
    }

    async fn process(&self, item: &PathBuf) -> Result<(), ApplicationError> {
        let outcome = self
            .handler
            .handle(MixNarration {
                voice_path: item.clone(),
                options: self.options.clone(),
            })
            .await?;

        if let MixOutcome::Mixed { output, .. } = outcome {
            tracing::info!(output = %output.display(), "Narration mixed");
        }
        Ok(())
    }
}
