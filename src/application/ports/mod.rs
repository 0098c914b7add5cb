//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod article_fetcher;
mod article_source;
mod audio_joiner;
mod output_storage;
mod tts_engine;

pub use article_fetcher::{ArticleFetcherPort, FetchError};
pub use article_source::{ArticleSourcePort, SourceError};
pub use audio_joiner::{AudioJoinError, AudioJoinerPort, MixRequest};
pub use output_storage::{OutputStoragePort, StorageError};
pub use tts_engine::{InferRequest, InferResponse, TtsEnginePort, TtsError};
