//! Fetch Adapter - 文章页面抓取与正文提取

mod extract;
mod http_article_fetcher;

pub use extract::extract_article_text;
pub use http_article_fetcher::{HttpArticleFetcher, HttpArticleFetcherConfig, DEFAULT_USER_AGENT};
