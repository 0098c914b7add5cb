//! 正文截断

/// 截断后可能残留在末尾的字段标签
const TRAILING_LABELS: &[&str] = &["口述", "素材", "编辑", "责", "编", "审", "核"];

/// 截取边界之前的正文，并去除末尾残留的标签
///
/// 只处理文本末尾，不会改动正文内部。边界为 0 时返回空串。
pub fn truncate(text: &str, boundary: usize) -> String {
    let mut boundary = boundary.min(text.len());
    while !text.is_char_boundary(boundary) {
        boundary -= 1;
    }

    let mut body = text[..boundary].trim_end();
    loop {
        let before = body.len();
        for label in TRAILING_LABELS {
            if let Some(rest) = body.strip_suffix(label) {
                body = rest.trim_end();
            }
        }
        if body.len() == before {
            break;
        }
    }

    body.to_string()
}
