//! Article Context - 文章限界上下文
//!
//! 职责:
//! - 表格行值对象与输出文件命名
//! - 行选择（测试模式、范围模式）

mod errors;
mod selection;
mod value_objects;

pub use errors::RangeError;
pub use selection::{RowSelection, TEST_MODE_ROWS};
pub use value_objects::{safe_title, ArticleRow, FailedArticle, MAX_TITLE_CHARS};
