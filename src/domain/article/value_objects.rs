//! Article Context - Value Objects

use std::fmt;

/// 文件名中不允许出现的字符
const UNSAFE_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// 文件名中标题部分的最大字符数
pub const MAX_TITLE_CHARS: usize = 50;

/// 表格中的一行文章
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    /// 序号（唯一，决定输出顺序和文件名）
    pub seq: u32,
    /// 标题
    pub title: String,
    /// 文章链接
    pub url: String,
}

impl ArticleRow {
    pub fn new(seq: u32, title: impl Into<String>, url: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            format!("Article_{}", seq)
        } else {
            title.trim().to_string()
        };
        Self {
            seq,
            title,
            url: url.into().trim().to_string(),
        }
    }

    /// 链接是否可抓取
    pub fn has_valid_url(&self) -> bool {
        self.url.contains("http")
    }

    /// 输出文件名主干：`{序号:03}_{安全标题}`
    pub fn file_stem(&self) -> String {
        format!("{:03}_{}", self.seq, safe_title(&self.title, MAX_TITLE_CHARS))
    }

    /// 日志用短标题
    pub fn short_title(&self, max_chars: usize) -> String {
        let mut short: String = self.title.chars().take(max_chars).collect();
        if self.title.chars().count() > max_chars {
            short.push_str("...");
        }
        short
    }
}

impl fmt::Display for ArticleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.seq, self.short_title(30))
    }
}

/// 将标题转成可用作文件名的形式
pub fn safe_title(title: &str, max_chars: usize) -> String {
    title
        .chars()
        .map(|c| if UNSAFE_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .take(max_chars)
        .collect()
}

/// 处理失败的文章
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedArticle {
    pub row: ArticleRow,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_replaces_unsafe_chars() {
        let row = ArticleRow::new(7, "问答：AI/芯片?", "https://mp.weixin.qq.com/s/x");
        assert_eq!(row.file_stem(), "007_问答：AI_芯片_");
    }

    #[test]
    fn test_file_stem_truncates_title() {
        let row = ArticleRow::new(12, "长".repeat(80), "https://example.com");
        let stem = row.file_stem();
        assert_eq!(stem.chars().count(), 4 + MAX_TITLE_CHARS);
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let row = ArticleRow::new(3, "  ", "https://example.com");
        assert_eq!(row.title, "Article_3");
    }

    #[test]
    fn test_url_validation() {
        assert!(ArticleRow::new(1, "a", "https://mp.weixin.qq.com/s/abc").has_valid_url());
        assert!(!ArticleRow::new(1, "a", "").has_valid_url());
        assert!(!ArticleRow::new(1, "a", "nan").has_valid_url());
    }

    #[test]
    fn test_short_title() {
        let row = ArticleRow::new(1, "一二三四五", "http://x");
        assert_eq!(row.short_title(3), "一二三...");
        assert_eq!(row.short_title(10), "一二三四五");
    }
}
