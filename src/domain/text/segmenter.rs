//! 文本分割器
//!
//! 将整理好的正文切成不超过最大字符数的片段，逐段送入 TTS 后再拼接。
//! 只在段落或句子边界切分，不会切断句子。

use super::markers::PARAGRAPH_SEPARATOR;

/// 默认单段最大字符数
pub const DEFAULT_MAX_CHARS: usize = 3000;

/// 文本分割配置
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// 单段最大字符数
    pub max_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

/// 检查是否为句末标点
#[inline]
fn is_strong_delimiter(ch: char) -> bool {
    matches!(ch, '。' | '？' | '！' | '?' | '!')
}

/// 检查是否为句末标点之后的收尾符号（引号、括号）
#[inline]
fn is_closing_mark(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\'' | '\u{201D}' | '\u{2019}' | '」' | '』' | '）' | ')' | '》'
    )
}

/// 按句末标点切分段落
///
/// 每个单元包含其结尾标点及紧随的引号，拼接后等于原段落。
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !is_strong_delimiter(ch) {
            continue;
        }
        // 连续的句末标点和收尾引号归入同一句
        while let Some(&(_, next)) = chars.peek() {
            if is_strong_delimiter(next) || is_closing_mark(next) {
                chars.next();
            } else {
                break;
            }
        }
        let end = chars.peek().map_or(paragraph.len(), |&(idx, _)| idx);
        sentences.push(&paragraph[start..end]);
        start = end;
    }

    if start < paragraph.len() {
        sentences.push(&paragraph[start..]);
    }

    sentences
}

/// 片段之间的连接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joint {
    /// 新段落，以段落分隔符连接
    Paragraph,
    /// 同一段落内的下一句，直接连接
    Inline,
}

/// 贪心装箱
struct SegmentPacker {
    max_chars: usize,
    segments: Vec<String>,
    current: String,
    current_chars: usize,
}

impl SegmentPacker {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            segments: Vec::new(),
            current: String::new(),
            current_chars: 0,
        }
    }

    fn push(&mut self, unit: &str, joint: Joint) {
        let unit_chars = unit.chars().count();

        if !self.current.is_empty() {
            let separator = match joint {
                Joint::Paragraph => PARAGRAPH_SEPARATOR,
                Joint::Inline => "",
            };
            let separator_chars = separator.chars().count();

            if self.current_chars + separator_chars + unit_chars <= self.max_chars {
                self.current.push_str(separator);
                self.current.push_str(unit);
                self.current_chars += separator_chars + unit_chars;
                return;
            }
            self.flush();
        }

        // 新片段开头不保留空白
        let unit = unit.trim_start();
        self.current.push_str(unit);
        self.current_chars = unit.chars().count();
    }

    fn flush(&mut self) {
        let segment = std::mem::take(&mut self.current);
        self.current_chars = 0;
        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            self.segments.push(trimmed.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.segments
    }
}

/// 对文本进行分段
///
/// 分段策略：
/// 1. 文本不超过最大字符数时整体作为一段
/// 2. 按段落分隔符拆分，贪心合并段落
/// 3. 超长段落按句末标点拆分后同样贪心合并
///
/// 单个句子超过最大字符数时单独成段，不在句中切分。
pub fn segment_text(text: &str, config: &SegmentConfig) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if text.chars().count() <= config.max_chars {
        return vec![text.to_string()];
    }

    let mut packer = SegmentPacker::new(config.max_chars);

    let paragraphs = text
        .split(PARAGRAPH_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty());

    for paragraph in paragraphs {
        if paragraph.chars().count() <= config.max_chars {
            packer.push(paragraph, Joint::Paragraph);
            continue;
        }

        for (i, sentence) in split_sentences(paragraph).into_iter().enumerate() {
            let joint = if i == 0 { Joint::Paragraph } else { Joint::Inline };
            packer.push(sentence, joint);
        }
    }

    packer.finish()
}

/// 使用默认配置分段（便捷方法）
pub fn segment_text_default(text: &str) -> Vec<String> {
    segment_text(text, &SegmentConfig::default())
}
