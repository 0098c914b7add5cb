//! Text Context - 正文清理与分段
//!
//! 纯函数，无 I/O：
//! - markers: 尾部标记检测
//! - truncator: 截断与末尾残留清理
//! - normalizer: 朗读格式整理
//! - segmenter: 按长度分段

mod markers;
mod normalizer;
mod segmenter;
mod truncator;

pub use markers::{
    detect_tail, Marker, TailMatch, BLOCK_THRESHOLD_CHARS, DEFAULT_MARKERS, PARAGRAPH_SEPARATOR,
    SIGNATURE_SNAP_CHARS,
};
pub use normalizer::{has_lone_line_break, normalize, PAUSE_MARKER};
pub use segmenter::{segment_text, segment_text_default, SegmentConfig, DEFAULT_MAX_CHARS};
pub use truncator::truncate;

/// 默认最少正文字符数，低于此值视为没有可用正文
pub const DEFAULT_MIN_BODY_CHARS: usize = 1;

/// 清理后的正文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    pub text: String,
    /// 触发截断的标记
    pub tail_marker: Option<String>,
    /// 原始文本字符数
    pub raw_chars: usize,
}

impl CleanedText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// 清理文章正文：检测尾部标记、截断、整理格式
///
/// 结果不足 `min_body_chars` 个字符时返回 `None`，表示没有可用正文。
pub fn clean_article(raw: &str, markers: &[Marker], min_body_chars: usize) -> Option<CleanedText> {
    let tail = detect_tail(raw, markers);
    let body = truncate(raw, tail.boundary);
    let text = normalize(&body);

    if text.chars().count() < min_body_chars.max(1) {
        return None;
    }

    Some(CleanedText {
        text,
        tail_marker: tail.marker,
        raw_chars: raw.chars().count(),
    })
}
