//! 尾部标记检测
//!
//! 公众号文章正文之后通常紧跟责编署名、来源声明、投稿信息等元数据。
//! 检测器找出最早出现的"正文结束"标记，给出截断位置。

use once_cell::sync::Lazy;
use regex::Regex;

/// 短段落阈值（字符数）
///
/// 标记所在段落短于此值时，整段视为署名块删除
pub const BLOCK_THRESHOLD_CHARS: usize = 200;

/// 段落分隔符
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// 署名行命中时，回退到这一范围（距文本末尾的字符数）内最后一个句号之后
pub const SIGNATURE_SNAP_CHARS: usize = 300;

/// 字面量停止标记
const LITERAL_MARKERS: &[&str] = &[
    "访谈手记",
    "*文中观点为访谈者",
    "文中观点为访谈者",
    "文中观点为作者",
    "文中观点仅供参考",
    "策　　划：",
    "策  划：",
    "策划：",
    "访谈作者：",
    "责　　编：",
    "责  编：",
    "责编：",
    "审　　核：",
    "审  核：",
    "审核：",
    "值班编委：",
    "来　　源：",
    "来  源：",
    "来源：",
    "出品：",
    "监制：",
    "执行：",
    "编委：",
    "转载请注明",
    "欢迎您的来稿",
    "投稿邮箱",
    "微信公众号",
    "相关阅读",
    "推荐阅读",
    "延伸阅读",
];

/// 署名行标签（标签后直到文本末尾都不含换行）
///
/// 两字标签之间允许空白或停顿标记，覆盖 `口，，，述：` 这类空格被替换后的写法
const SIGNATURE_LABELS: &[&str] = &[
    r"编[\s，]*辑\s*[:：]",
    r"责[\s，]*编\s*[:：]",
    r"审[\s，]*核\s*[:：]",
    r"策[\s，]*划\s*[:：]",
    r"访谈作者\s*[:：]",
    r"值班编委\s*[:：]",
    r"口[\s，]*述\s*[:：]",
    r"特别鸣谢",
];

/// 默认标记集合
pub static DEFAULT_MARKERS: Lazy<Vec<Marker>> = Lazy::new(|| {
    let mut markers: Vec<Marker> = LITERAL_MARKERS.iter().map(|m| Marker::literal(*m)).collect();
    markers.extend(
        SIGNATURE_LABELS
            .iter()
            .map(|label| Marker::signature(label).expect("signature label is a valid regex")),
    );
    markers
});

/// 正文结束标记
#[derive(Debug, Clone)]
pub enum Marker {
    /// 字面量，匹配首次出现位置
    Literal(String),
    /// 标签 + 非换行字符直到文本末尾（末尾空白不计）
    Signature { label: String, regex: Regex },
}

impl Marker {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// 由标签正则构造署名行标记
    pub fn signature(label: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"(?:{label})[^\n]*\s*\z"))?;
        Ok(Self::Signature {
            label: label.to_string(),
            regex,
        })
    }

    /// 诊断用标签
    pub fn label(&self) -> &str {
        match self {
            Marker::Literal(text) => text,
            Marker::Signature { label, .. } => label,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Marker::Literal(_))
    }

    /// 首次出现的字节偏移
    pub fn find_in(&self, text: &str) -> Option<usize> {
        match self {
            Marker::Literal(literal) => text.find(literal.as_str()),
            Marker::Signature { regex, .. } => regex.find(text).map(|m| m.start()),
        }
    }
}

/// 检测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailMatch {
    /// 截断位置（字节偏移，位于字符边界）
    pub boundary: usize,
    /// 触发截断的标记
    pub marker: Option<String>,
}

impl TailMatch {
    fn not_found(text: &str) -> Self {
        Self {
            boundary: text.len(),
            marker: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.marker.is_some()
    }
}

/// 查找最早的尾部标记
///
/// 位置最靠前的命中生效，与标记在列表中的顺序无关。
/// 字面量命中落在短段落（两侧为段落分隔符）内时，从该段落之前的分隔符处截断；
/// 署名行命中时，截断位置回退到末尾附近最后一个 `。` 之后。
pub fn detect_tail(text: &str, markers: &[Marker]) -> TailMatch {
    let earliest = markers
        .iter()
        .filter_map(|marker| marker.find_in(text).map(|pos| (pos, marker)))
        .min_by_key(|(pos, _)| *pos);

    let Some((pos, marker)) = earliest else {
        return TailMatch::not_found(text);
    };

    let boundary = if marker.is_literal() {
        short_block_start(text, pos).unwrap_or(pos)
    } else {
        sentence_end_before(text, pos).unwrap_or(pos)
    };

    TailMatch {
        boundary,
        marker: Some(marker.label().to_string()),
    }
}

/// 命中位置所在段落足够短时，返回其前一个段落分隔符的起点
fn short_block_start(text: &str, pos: usize) -> Option<usize> {
    let separator_start = text[..pos].rfind(PARAGRAPH_SEPARATOR)?;
    let block_start = separator_start + PARAGRAPH_SEPARATOR.len();
    let block_end = text[block_start..]
        .find(PARAGRAPH_SEPARATOR)
        .map_or(text.len(), |offset| block_start + offset);

    let block_chars = text[block_start..block_end].chars().count();
    (block_chars < BLOCK_THRESHOLD_CHARS).then_some(separator_start)
}

/// 署名前最后一个句号之后的位置，句号须落在文本末尾 `SIGNATURE_SNAP_CHARS` 个字符内
fn sentence_end_before(text: &str, pos: usize) -> Option<usize> {
    let period = text[..pos].rfind('。')?;
    let end = period + '。'.len_utf8();
    (text[period..].chars().count() <= SIGNATURE_SNAP_CHARS).then_some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marker_returns_text_length() {
        let text = "这是一段普通的正文。\n\n没有任何署名信息。";
        let tail = detect_tail(text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, text.len());
        assert!(!tail.is_found());
    }

    #[test]
    fn test_short_paragraph_removed_entirely() {
        let text = "标题\n\n正文第一段。\n\n正文第二段。\n\n责编：张三";
        let tail = detect_tail(text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, text.rfind("\n\n").unwrap());
        assert_eq!(tail.marker.as_deref(), Some("责编："));
    }

    #[test]
    fn test_long_paragraph_cut_at_marker() {
        let body = "很长的正文内容".repeat(40);
        let text = format!("开头。\n\n{}来源：某报", body);
        let tail = detect_tail(&text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, text.find("来源：").unwrap());
    }

    #[test]
    fn test_earliest_offset_wins_over_list_order() {
        // "微信公众号" 排在列表末尾，但位置更靠前
        let markers = vec![Marker::literal("责编："), Marker::literal("微信公众号")];
        let text = "正文。微信公众号：某某 责编：张三";
        let tail = detect_tail(text, &markers);
        assert_eq!(tail.boundary, text.find("微信公众号").unwrap());
        assert_eq!(tail.marker.as_deref(), Some("微信公众号"));
    }

    #[test]
    fn test_marker_in_first_block_cuts_at_marker() {
        let text = "正文开始。来源：新华社\n\n后续内容";
        let tail = detect_tail(text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, text.find("来源：").unwrap());
    }

    #[test]
    fn test_marker_at_start_gives_zero_boundary() {
        let text = "转载请注明出处";
        let tail = detect_tail(text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, 0);
    }

    #[test]
    fn test_full_width_spaced_variant_detected() {
        let text = "正文结束。\n\n责　　编：李四";
        let tail = detect_tail(text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, text.find("\n\n").unwrap());
    }

    #[test]
    fn test_signature_line_requires_end_of_text() {
        let markers = vec![Marker::signature(r"编\s*辑\s*[:：]").unwrap()];

        let tail = detect_tail("正文。编辑：王五", &markers);
        assert_eq!(tail.boundary, "正文。".len());

        // 署名后还有换行内容时不算署名行
        let tail = detect_tail("编辑：王五\n继续正文", &markers);
        assert!(!tail.is_found());
    }

    #[test]
    fn test_signature_marker_does_not_walk_back() {
        let markers = vec![Marker::signature(r"特别鸣谢").unwrap()];
        let text = "第一段。\n\n第二段。特别鸣谢某单位";
        let tail = detect_tail(text, &markers);
        assert_eq!(tail.boundary, text.find("特别鸣谢").unwrap());
    }

    #[test]
    fn test_signature_tolerates_trailing_whitespace() {
        let markers = vec![Marker::signature(r"编\s*辑\s*[:：]").unwrap()];
        for text in ["正文内容。\n\n编辑：王五", "正文内容。\n\n编辑：王五\n", "正文内容。\n\n编辑：王五 \n\n"] {
            let tail = detect_tail(text, &markers);
            assert_eq!(tail.boundary, "正文内容。".len(), "missed signature in {text:?}");
        }
    }

    #[test]
    fn test_signature_snaps_back_to_last_sentence_end() {
        let text = "第一句。第二句没有句号 特别鸣谢某单位";
        let tail = detect_tail(text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, "第一句。".len());

        // 句号离末尾太远时在标签处截断
        let text = format!("第一句。{}特别鸣谢某单位", "长".repeat(SIGNATURE_SNAP_CHARS));
        let tail = detect_tail(&text, &DEFAULT_MARKERS);
        assert_eq!(tail.boundary, text.find("特别鸣谢").unwrap());
    }

    #[test]
    fn test_pause_mangled_signature_labels() {
        for text in ["正文。\n\n口，，，述：张三", "正文。\n\n责，，，编：李四", "正文。\n\n审 ，，， 核：王五"] {
            let tail = detect_tail(text, &DEFAULT_MARKERS);
            assert_eq!(tail.boundary, "正文。".len(), "missed signature in {text:?}");
        }
    }

    #[test]
    fn test_block_threshold_edge() {
        // 段落 199 个字符：整段删除
        let block = format!("来源：{}", "某".repeat(BLOCK_THRESHOLD_CHARS - 4));
        assert_eq!(block.chars().count(), BLOCK_THRESHOLD_CHARS - 1);
        let text = format!("开头。\n\n{block}");
        assert_eq!(detect_tail(&text, &DEFAULT_MARKERS).boundary, text.find("\n\n").unwrap());

        // 段落 200 个字符：在标记处截断
        let block = format!("来源：{}", "某".repeat(BLOCK_THRESHOLD_CHARS - 3));
        assert_eq!(block.chars().count(), BLOCK_THRESHOLD_CHARS);
        let text = format!("开头。\n\n{block}");
        assert_eq!(detect_tail(&text, &DEFAULT_MARKERS).boundary, text.find("来源：").unwrap());
    }
}
