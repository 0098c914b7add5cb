//! Article Text Handlers - 抓取、清理并保存正文

use std::sync::Arc;

use crate::application::commands::article_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{ArticleFetcherPort, OutputStoragePort};
use crate::domain::text::{clean_article, DEFAULT_MARKERS};

/// FetchArticleText Handler
pub struct FetchArticleTextHandler {
    fetcher: Arc<dyn ArticleFetcherPort>,
    storage: Arc<dyn OutputStoragePort>,
}

impl FetchArticleTextHandler {
    pub fn new(fetcher: Arc<dyn ArticleFetcherPort>, storage: Arc<dyn OutputStoragePort>) -> Self {
        Self { fetcher, storage }
    }

    pub async fn handle(&self, cmd: FetchArticleText) -> Result<FetchArticleTextResponse, ApplicationError> {
        let row = &cmd.row;

        if !row.has_valid_url() {
            return Err(ApplicationError::InvalidUrl(row.url.clone()));
        }

        let raw = self.fetcher.fetch_text(&row.url).await?;

        let cleaned = clean_article(&raw, &DEFAULT_MARKERS, cmd.clean.min_body_chars)
            .ok_or(ApplicationError::EmptyAfterClean)?;

        tracing::info!(
            seq = row.seq,
            raw_chars = cleaned.raw_chars,
            text_chars = cleaned.char_count(),
            tail_marker = ?cleaned.tail_marker,
            "Article text cleaned"
        );

        let text_path = self.storage.save_text(row, &cleaned.text).await?;

        Ok(FetchArticleTextResponse {
            text: cleaned.text,
            text_path,
            tail_marker: cleaned.tail_marker,
        })
    }
}
