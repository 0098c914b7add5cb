//! Article Source Port - 文章列表来源

use std::path::Path;
use thiserror::Error;

use crate::domain::article::ArticleRow;

/// 文章列表读取错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Article Source Port
///
/// 从表格文件读取文章行（序号、标题、链接）
pub trait ArticleSourcePort: Send + Sync {
    fn load(&self, path: &Path) -> Result<Vec<ArticleRow>, SourceError>;
}
