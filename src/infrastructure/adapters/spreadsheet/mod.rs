//! Spreadsheet Adapter - 文章列表读取

mod sheet_reader;

pub use sheet_reader::{rows_to_articles, SpreadsheetSource};
