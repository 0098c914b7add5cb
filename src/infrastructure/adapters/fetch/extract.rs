//! 正文提取
//!
//! 从公众号文章页面中取出正文容器的纯文本。
//! 文本节点之间以 `\n` 连接，块级元素边界为 `\n\n`。

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Node, Selector};

/// 正文容器，按顺序尝试
static BODY_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["div.rich_media_content", "div#js_content"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// 不参与朗读的元素
const SKIPPED_TAGS: &[&str] = &["script", "style", "iframe", "noscript"];

/// 块级元素，前后视为段落边界
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
    "ol", "li", "table", "tr", "figure", "figcaption", "pre", "hr",
];

/// 提取正文纯文本，找不到正文容器或容器为空时返回 `None`
pub fn extract_article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let body = BODY_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).next())?;

    let mut collector = TextCollector::default();
    collector.walk(body);

    let text = collector.finish();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[derive(Default)]
struct TextCollector {
    out: String,
    paragraph_pending: bool,
}

impl TextCollector {
    fn walk(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(el) => {
                    let name = el.name();
                    if SKIPPED_TAGS.contains(&name) {
                        continue;
                    }
                    let is_block = BLOCK_TAGS.contains(&name);
                    if is_block {
                        self.paragraph_pending = true;
                    }
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.walk(child_element);
                    }
                    if is_block {
                        self.paragraph_pending = true;
                    }
                }
                _ => {}
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.out.is_empty() {
            self.out
                .push_str(if self.paragraph_pending { "\n\n" } else { "\n" });
        }
        self.out.push_str(text);
        self.paragraph_pending = false;
    }

    fn finish(self) -> String {
        self.out
    }
}
