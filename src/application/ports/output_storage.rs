//! Output Storage Port - 输出文件存储
//!
//! 定义正文、配音、混音文件的路径规则与读写接口

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::article::{ArticleRow, FailedArticle};

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Output Storage Port
#[async_trait]
pub trait OutputStoragePort: Send + Sync {
    /// 保存清理后的正文（供人工核对）
    async fn save_text(&self, row: &ArticleRow, text: &str) -> Result<PathBuf, StorageError>;

    /// 配音文件路径
    fn voice_path(&self, row: &ArticleRow) -> PathBuf;

    /// 混音文件路径
    fn final_path(&self, voice_path: &Path, background: &Path) -> PathBuf;

    /// 为分段音频创建临时目录
    async fn create_fragment_dir(&self, row: &ArticleRow) -> Result<PathBuf, StorageError>;

    /// 写入音频数据
    async fn write_audio(&self, path: &Path, data: &[u8]) -> Result<(), StorageError>;

    /// 删除文件（不存在时忽略）
    async fn remove_file(&self, path: &Path) -> Result<(), StorageError>;

    /// 删除目录及其内容（不存在时忽略）
    async fn remove_dir(&self, dir: &Path) -> Result<(), StorageError>;

    /// 背景音乐列表（按文件名排序）
    async fn list_background_tracks(&self) -> Result<Vec<PathBuf>, StorageError>;

    /// 已生成的配音列表（不含混音输出，按文件名排序）
    async fn list_voice_files(&self) -> Result<Vec<PathBuf>, StorageError>;

    /// 写出失败文章清单
    async fn write_failed_report(&self, failures: &[FailedArticle]) -> Result<PathBuf, StorageError>;
}
