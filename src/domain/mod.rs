//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Article Context: 文章行与输出命名
//! - Text Context: 正文清理与分段

pub mod article;
pub mod text;
