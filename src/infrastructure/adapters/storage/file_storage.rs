//! File Storage - 文件系统输出存储实现
//!
//! 实现 OutputStoragePort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{OutputStoragePort, StorageError};
use crate::domain::article::{ArticleRow, FailedArticle};

/// 分段临时目录名（位于配音目录下）
const FRAGMENT_ROOT: &str = ".temp_segments";

/// 失败清单文件名
pub const FAILED_REPORT_NAME: &str = "_FAILED_ARTICLES.txt";

/// 混音输出文件名中的标记
pub const MIX_MARKER: &str = "_with_bgm_";

/// 可识别的背景音乐扩展名
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "flac", "ogg"];

/// 输出目录布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// 清理后的正文
    pub text_dir: PathBuf,
    /// 纯配音
    pub voice_dir: PathBuf,
    /// 混音输出
    pub final_dir: PathBuf,
    /// 背景音乐素材
    pub bgm_dir: PathBuf,
}

impl OutputLayout {
    /// 以 `root` 为根的默认布局
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            text_dir: root.join("articles_for_review"),
            voice_dir: root.join("audio_output"),
            final_dir: root.join("audio_with_bgm"),
            bgm_dir: root.join("素材"),
        }
    }
}

/// 文件系统输出存储
pub struct FileOutputStorage {
    layout: OutputLayout,
}

impl FileOutputStorage {
    /// 创建新的文件存储（确保正文与配音目录存在）
    pub async fn new(layout: OutputLayout) -> Result<Self, StorageError> {
        for dir in [&layout.text_dir, &layout.voice_dir] {
            fs::create_dir_all(dir).await.map_err(io_error)?;
        }
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// 列出目录下的音频文件，按文件名排序；目录不存在时为空
    async fn list_audio(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut entries = fs::read_dir(dir).await.map_err(io_error)?;

        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let path = entry.path();
            if path.is_file() && is_audio_file(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn io_error(err: std::io::Error) -> StorageError {
    StorageError::IoError(err.to_string())
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            AUDIO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl OutputStoragePort for FileOutputStorage {
    async fn save_text(&self, row: &ArticleRow, text: &str) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.layout.text_dir)
            .await
            .map_err(io_error)?;

        let path = self.layout.text_dir.join(format!("{}.txt", row.file_stem()));
        fs::write(&path, text).await.map_err(io_error)?;

        tracing::debug!(seq = row.seq, path = %path.display(), "Saved article text");
        Ok(path)
    }

    fn voice_path(&self, row: &ArticleRow) -> PathBuf {
        self.layout.voice_dir.join(format!("{}.mp3", row.file_stem()))
    }

    fn final_path(&self, voice_path: &Path, background: &Path) -> PathBuf {
        self.layout.final_dir.join(format!(
            "{}{}{}.mp3",
            file_stem(voice_path),
            MIX_MARKER,
            file_stem(background)
        ))
    }

    async fn create_fragment_dir(&self, row: &ArticleRow) -> Result<PathBuf, StorageError> {
        let dir = self
            .layout
            .voice_dir
            .join(FRAGMENT_ROOT)
            .join(format!("{}-{}", row.file_stem(), Uuid::new_v4()));

        fs::create_dir_all(&dir).await.map_err(io_error)?;
        Ok(dir)
    }

    async fn write_audio(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        fs::write(path, data).await.map_err(io_error)?;

        tracing::debug!(path = %path.display(), size = data.len(), "Saved audio");
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> Result<(), StorageError> {
        if path.exists() {
            fs::remove_file(path).await.map_err(io_error)?;
        }
        Ok(())
    }

    async fn remove_dir(&self, dir: &Path) -> Result<(), StorageError> {
        if dir.exists() {
            fs::remove_dir_all(dir).await.map_err(io_error)?;
        }
        // 空的临时根目录一并清掉
        if let Some(parent) = dir.parent() {
            if parent.ends_with(FRAGMENT_ROOT) {
                let _ = fs::remove_dir(parent).await;
            }
        }
        Ok(())
    }

    async fn list_background_tracks(&self) -> Result<Vec<PathBuf>, StorageError> {
        self.list_audio(&self.layout.bgm_dir).await
    }

    async fn list_voice_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let files = self.list_audio(&self.layout.voice_dir).await?;
        Ok(files
            .into_iter()
            .filter(|p| !file_stem(p).contains("with_bgm"))
            .collect())
    }

    async fn write_failed_report(&self, failures: &[FailedArticle]) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.layout.text_dir)
            .await
            .map_err(io_error)?;

        let mut report = format!(
            "生成时间: {}\n失败数量: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            failures.len()
        );
        for failed in failures {
            report.push_str(&format!("序号: {}\n", failed.row.seq));
            report.push_str(&format!("标题: {}\n", failed.row.title));
            report.push_str(&format!("链接: {}\n", failed.row.url));
            report.push_str(&format!("原因: {}\n", failed.reason));
            report.push_str(&"-".repeat(40));
            report.push('\n');
        }

        let path = self.layout.text_dir.join(FAILED_REPORT_NAME);
        fs::write(&path, report).await.map_err(io_error)?;

        tracing::info!(count = failures.len(), path = %path.display(), "Wrote failed article list");
        Ok(path)
    }
}
