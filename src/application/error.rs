//! 应用层错误定义
//!
//! 单篇文章处理的错误分类，批处理只记录不中断

use thiserror::Error;

use crate::application::ports::{FetchError, StorageError, TtsError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 链接无效，未尝试抓取
    #[error("Invalid article URL: {0:?}")]
    InvalidUrl(String),

    /// 抓取或正文提取失败
    #[error("Fetch failure: {0}")]
    FetchFailure(String),

    /// 清理后没有可用正文
    #[error("No usable body text after cleaning")]
    EmptyAfterClean,

    /// 合成或片段拼接失败
    #[error("Synthesis failure: {0}")]
    SynthesisFailure(String),

    /// 背景音乐混音失败
    #[error("Mix failure: {0}")]
    MixFailure(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 简短分类名（用于汇总和日志）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidUrl(_) => "invalid_url",
            Self::FetchFailure(_) => "fetch",
            Self::EmptyAfterClean => "empty_after_clean",
            Self::SynthesisFailure(_) => "synthesis",
            Self::MixFailure(_) => "mix",
            Self::StorageError(_) => "storage",
            Self::ValidationError(_) => "validation",
        }
    }
}

impl From<FetchError> for ApplicationError {
    fn from(err: FetchError) -> Self {
        Self::FetchFailure(err.to_string())
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        Self::SynthesisFailure(err.to_string())
    }
}

impl From<StorageError> for ApplicationError {
    fn from(err: StorageError) -> Self {
        Self::StorageError(err.to_string())
    }
}
