//! 朗读格式整理
//!
//! 把网页提取出的按行断开的文本整理成适合 TTS 朗读的段落文本：
//! 行内折行直接拼接，多余空白变成停顿，真正的段落之间保留 `\n\n`。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 停顿标记
pub const PAUSE_MARKER: char = '，';

static RE_BREAK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").unwrap());
static RE_SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").unwrap());
static RE_PAUSE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"，{3,}").unwrap());
static RE_SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"([。！？])\s*\n\s*").unwrap());
static RE_PARAGRAPH_EDGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[，\s]*\n\n[，\s]*").unwrap());

/// 整理文本格式
///
/// 输出中不含单独的换行，只有 `\n\n` 段落分隔；对已整理的文本再次调用结果不变。
pub fn normalize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = join_wrapped_lines(&text);

    // 段落换行先转成三个停顿标记，由下面的停顿合并还原为段落分隔
    let text = RE_BREAK_RUN.replace_all(&text, |caps: &Captures| {
        if caps[0].len() > 1 {
            "，，，"
        } else {
            "，"
        }
    });
    let text = RE_SPACE_RUN.replace_all(&text, "，");
    let text = RE_PAUSE_RUN.replace_all(&text, "\n\n");
    let text = RE_SENTENCE_BREAK.replace_all(&text, "${1}\n\n");
    // 段落分隔两侧不留停顿或空白，否则再次整理时会被并入分隔符
    let text = RE_PARAGRAPH_EDGE.replace_all(&text, "\n\n");

    text.trim_matches(|c: char| c.is_whitespace() || c == PAUSE_MARKER)
        .to_string()
}

/// 删除单独的换行
///
/// 同时覆盖被折行拆开的汉字词语和标点后的折行，两侧直接拼接。
fn join_wrapped_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut joined = String::with_capacity(text.len());

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '\n' {
            let prev_is_break = i > 0 && chars[i - 1] == '\n';
            let next_is_break = chars.get(i + 1) == Some(&'\n');
            if !prev_is_break && !next_is_break {
                continue;
            }
        }
        joined.push(ch);
    }

    joined
}

/// 是否含有单独的换行
pub fn has_lone_line_break(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'\n'
            && (i == 0 || bytes[i - 1] != b'\n')
            && bytes.get(i + 1) != Some(&b'\n')
    })
}
