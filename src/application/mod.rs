//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ArticleFetcher、TtsEngine、AudioJoiner、OutputStorage 等）
//! - commands: 命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

pub use commands::{
    BackgroundOptions, CleanOptions, ConvertArticle, ConvertArticleResponse, ConvertOptions,
    FetchArticleText, FetchArticleTextResponse, MixNarration, MixOutcome,
    // Handlers
    handlers::{ConvertArticleHandler, FetchArticleTextHandler, MixNarrationHandler},
};

pub use error::ApplicationError;

pub use ports::{
    // Article source
    ArticleSourcePort,
    SourceError,
    // Article fetcher
    ArticleFetcherPort,
    FetchError,
    // Audio joiner
    AudioJoinError,
    AudioJoinerPort,
    MixRequest,
    // Output storage
    OutputStoragePort,
    StorageError,
    // TTS engine
    InferRequest,
    InferResponse,
    TtsEnginePort,
    TtsError,
};
