//! 应用层 - 命令
//!
//! 单篇文章的抓取、转换与混音

mod article_commands;

pub mod handlers;

pub use article_commands::*;
