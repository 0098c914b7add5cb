//! Storage Adapter - 输出文件存储

mod file_storage;

pub use file_storage::{FileOutputStorage, OutputLayout, FAILED_REPORT_NAME, MIX_MARKER};
