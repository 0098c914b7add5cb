//! HTTP Article Fetcher - 抓取公众号文章
//!
//! 实现 ArticleFetcherPort trait。先 GET，失败时改用 POST 再试一次。

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;

use super::extract::extract_article_text;
use crate::application::ports::{ArticleFetcherPort, FetchError};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// 抓取客户端配置
#[derive(Debug, Clone)]
pub struct HttpArticleFetcherConfig {
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
    pub user_agent: String,
    /// 是否接受无效证书
    pub accept_invalid_certs: bool,
}

impl Default for HttpArticleFetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: true,
        }
    }
}

/// HTTP 文章抓取器
pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new(config: HttpArticleFetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| FetchError::NetworkError(e.to_string()))?;

        Ok(Self { client })
    }

    async fn fetch_with(&self, method: Method, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .request(method, url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await.map_err(map_request_error)?;
        extract_article_text(&html).ok_or(FetchError::ContentNotFound)
    }
}

fn map_request_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkError(err.to_string())
    }
}

#[async_trait]
impl ArticleFetcherPort for HttpArticleFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let mut last_error = FetchError::ContentNotFound;

        for method in [Method::GET, Method::POST] {
            match self.fetch_with(method.clone(), url).await {
                Ok(text) => {
                    tracing::debug!(%method, url, chars = text.chars().count(), "Fetched article text");
                    return Ok(text);
                }
                Err(err) => {
                    tracing::debug!(%method, url, error = %err, "Fetch attempt failed");
                    last_error = err;
                }
            }
        }

        Err(last_error)
    }
}
