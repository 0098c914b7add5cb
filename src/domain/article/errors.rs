//! Article Context - Errors

use thiserror::Error;

/// 行范围解析错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("无效的范围格式: {0}（应为 START-END，例如 2-10）")]
    InvalidFormat(String),

    #[error("起始序号必须从 1 开始: {0}")]
    ZeroStart(usize),

    #[error("起始序号 {start} 大于结束序号 {end}")]
    StartAfterEnd { start: usize, end: usize },
}
