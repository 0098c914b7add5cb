//! Article Fetcher Port - 文章抓取抽象

use async_trait::async_trait;
use thiserror::Error;

/// 抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Article body not found in page")]
    ContentNotFound,
}

/// Article Fetcher Port
///
/// 给定链接，返回已提取的正文纯文本（以换行标记结构边界）
#[async_trait]
pub trait ArticleFetcherPort: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}
