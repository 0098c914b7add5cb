//! Spreadsheet Source - 从 Excel / CSV 读取文章列表
//!
//! 实现 ArticleSourcePort trait。第一行非空行为表头，按列名定位：
//! 序号、图文名称、图文链接（也接受 seq / title / url）。

use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashSet;
use std::path::Path;

use crate::application::ports::{ArticleSourcePort, SourceError};
use crate::domain::article::ArticleRow;

const SEQ_ALIASES: &[&str] = &["序号", "seq", "no", "index"];
const TITLE_ALIASES: &[&str] = &["图文名称", "标题", "title"];
const URL_ALIASES: &[&str] = &["图文链接", "链接", "url", "link"];

/// 表格文章来源
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetSource {
    /// 指定工作表名，为空时读取第一个工作表
    pub sheet: Option<String>,
}

impl SpreadsheetSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_workbook(&self, path: &Path) -> Result<Vec<Vec<String>>, SourceError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| SourceError::ParseError(e.to_string()))?;

        let range = match &self.sheet {
            Some(name) => workbook.worksheet_range(name),
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| SourceError::ParseError("Workbook has no sheets".to_string()))?,
        }
        .map_err(|e| SourceError::ParseError(e.to_string()))?;

        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    fn read_csv(&self, path: &Path) -> Result<Vec<Vec<String>>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| SourceError::IoError(e.to_string()))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SourceError::ParseError(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

impl ArticleSourcePort for SpreadsheetSource {
    fn load(&self, path: &Path) -> Result<Vec<ArticleRow>, SourceError> {
        if !path.exists() {
            return Err(SourceError::IoError(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let rows = match extension.as_str() {
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => self.read_workbook(path)?,
            "csv" => self.read_csv(path)?,
            other => return Err(SourceError::UnsupportedFormat(other.to_string())),
        };

        let articles = rows_to_articles(rows)?;
        tracing::info!(
            path = %path.display(),
            rows = articles.len(),
            "Loaded article list"
        );
        Ok(articles)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn normalize_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn find_column(header: &[String], aliases: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|cell| aliases.contains(&normalize_header(cell).as_str()))
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

fn parse_seq(value: &str) -> Option<u32> {
    let value = value.trim();
    value.parse::<u32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u32)
    })
}

/// 把表格行转成文章行
///
/// 序号为空或无法解析的行、重复序号的行被跳过并记录警告。
pub fn rows_to_articles(rows: Vec<Vec<String>>) -> Result<Vec<ArticleRow>, SourceError> {
    let mut rows = rows
        .into_iter()
        .skip_while(|row| row.iter().all(|cell| cell.trim().is_empty()));

    let header = rows
        .next()
        .ok_or_else(|| SourceError::ParseError("Spreadsheet is empty".to_string()))?;

    let seq_col = find_column(&header, SEQ_ALIASES).ok_or(SourceError::MissingColumn("序号"))?;
    let url_col = find_column(&header, URL_ALIASES).ok_or(SourceError::MissingColumn("图文链接"))?;
    let title_col = find_column(&header, TITLE_ALIASES);

    let mut seen = HashSet::new();
    let mut articles = Vec::new();

    for (line, row) in rows.enumerate() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let Some(seq) = parse_seq(cell(&row, seq_col)) else {
            tracing::warn!(line = line + 2, value = cell(&row, seq_col), "Skipping row without sequence number");
            continue;
        };
        if !seen.insert(seq) {
            tracing::warn!(seq, "Skipping row with duplicate sequence number");
            continue;
        }

        let title = title_col.map(|col| cell(&row, col)).unwrap_or("");
        articles.push(ArticleRow::new(seq, title, cell(&row, url_col)));
    }

    Ok(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_rows_by_chinese_header() {
        let articles = rows_to_articles(rows(&[
            &["图文名称", "序号", "图文链接"],
            &["第一篇", "1", "https://mp.weixin.qq.com/s/a"],
            &["", "2.0", "https://mp.weixin.qq.com/s/b"],
        ]))
        .unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0], ArticleRow::new(1, "第一篇", "https://mp.weixin.qq.com/s/a"));
        assert_eq!(articles[1].seq, 2);
        assert_eq!(articles[1].title, "Article_2");
    }

    #[test]
    fn test_rows_skip_missing_and_duplicate_seq() {
        let articles = rows_to_articles(rows(&[
            &["", ""],
            &["seq", "url"],
            &["", "https://x"],
            &["abc", "https://y"],
            &["3", "https://z"],
            &["3", "https://dup"],
            &["", ""],
        ]))
        .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "https://z");
    }

    #[test]
    fn test_missing_url_column() {
        let result = rows_to_articles(rows(&[&["序号", "图文名称"], &["1", "a"]]));
        assert!(matches!(result, Err(SourceError::MissingColumn("图文链接"))));
    }

    #[test]
    fn test_empty_sheet() {
        assert!(matches!(rows_to_articles(Vec::new()), Err(SourceError::ParseError(_))));
    }

    #[test]
    fn test_load_csv_with_bom() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("list.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "\u{feff}序号,图文名称,图文链接\n1,\"标题,带逗号\",https://mp.weixin.qq.com/s/a\n2,第二篇,\n"
        )
        .unwrap();

        let articles = SpreadsheetSource::new().load(&path).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "标题,带逗号");
        assert!(!articles[1].has_valid_url());
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("list.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(matches!(
            SpreadsheetSource::new().load(&path),
            Err(SourceError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SpreadsheetSource::new().load(Path::new("/nonexistent/list.xlsx")),
            Err(SourceError::IoError(_))
        ));
    }
}
