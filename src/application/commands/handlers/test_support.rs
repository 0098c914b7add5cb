//! Handler 测试用的替身实现

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::ports::{
    ArticleFetcherPort, AudioJoinError, AudioJoinerPort, FetchError, MixRequest,
};

/// 按链接返回固定页面正文；未登记的链接超时
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArticleFetcherPort for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or(FetchError::Timeout)
    }
}

/// 在本地文件上模拟拼接与混音
#[derive(Default)]
pub struct RecordingJoiner {
    fail_concat: bool,
    fail_mix: bool,
    mixes: Mutex<Vec<MixRequest>>,
}

impl RecordingJoiner {
    /// 拼接写出部分结果后失败
    pub fn failing_concat() -> Self {
        Self {
            fail_concat: true,
            ..Default::default()
        }
    }

    /// 混音写出部分结果后失败
    pub fn failing_mix() -> Self {
        Self {
            fail_mix: true,
            ..Default::default()
        }
    }

    pub fn mixes(&self) -> Vec<MixRequest> {
        self.mixes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioJoinerPort for RecordingJoiner {
    async fn concatenate(&self, fragments: &[PathBuf], output: &Path) -> Result<(), AudioJoinError> {
        if fragments.is_empty() {
            return Err(AudioJoinError::NoFragments);
        }
        // 先写出部分结果再失败，检验调用方会清理
        let mut joined = Vec::new();
        for fragment in fragments {
            joined.extend(std::fs::read(fragment).map_err(|e| AudioJoinError::IoError(e.to_string()))?);
        }
        std::fs::write(output, &joined).map_err(|e| AudioJoinError::IoError(e.to_string()))?;

        if self.fail_concat {
            return Err(AudioJoinError::CommandFailed {
                tool: "ffmpeg".to_string(),
                message: "concat failed".to_string(),
            });
        }
        Ok(())
    }

    async fn mix_with_background(&self, request: &MixRequest) -> Result<(), AudioJoinError> {
        self.mixes.lock().unwrap().push(request.clone());
        if let Some(parent) = request.output.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AudioJoinError::IoError(e.to_string()))?;
        }
        std::fs::write(&request.output, b"mixed").map_err(|e| AudioJoinError::IoError(e.to_string()))?;

        if self.fail_mix {
            return Err(AudioJoinError::CommandFailed {
                tool: "ffmpeg".to_string(),
                message: "mix failed".to_string(),
            });
        }
        Ok(())
    }
}
