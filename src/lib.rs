//! tingwen - 公众号文章批量转音频
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Article Context: 表格行、文件命名、行选择
//! - Text Context: 尾部标记检测、截断、朗读格式整理、分段
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ArticleFetcher, TtsEngine, AudioJoiner, OutputStorage, ArticleSource）
//! - Commands: 单篇文章的抓取、转换、混音处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: HTTP 抓取、HTTP TTS、ffmpeg、表格读取、文件存储
//! - Worker: BatchWorker 顺序批处理

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
