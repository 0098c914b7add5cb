//! 行选择：测试模式、范围模式

use super::errors::RangeError;

/// 测试模式处理的行数
pub const TEST_MODE_ROWS: usize = 3;

/// 要处理的行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowSelection {
    /// 全部
    #[default]
    All,
    /// 测试模式，仅前几行
    Test,
    /// 范围模式（从 1 开始，闭区间；end 为空表示到末尾）
    Range { start: usize, end: Option<usize> },
}

impl RowSelection {
    /// 解析 `START-END` 或 `START`
    pub fn parse_range(spec: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidFormat(spec.to_string());

        let mut parts = spec.trim().splitn(2, '-');
        let start = parts
            .next()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .ok_or_else(invalid)?;
        let end = match parts.next() {
            Some(s) => Some(s.trim().parse::<usize>().map_err(|_| invalid())?),
            None => None,
        };

        Self::from_bounds(Some(start), end)
    }

    /// 由独立的起止序号构造
    pub fn from_bounds(start: Option<usize>, end: Option<usize>) -> Result<Self, RangeError> {
        if start.is_none() && end.is_none() {
            return Ok(Self::All);
        }

        let start = start.unwrap_or(1);
        if start == 0 {
            return Err(RangeError::ZeroStart(start));
        }
        if let Some(end) = end {
            if start > end {
                return Err(RangeError::StartAfterEnd { start, end });
            }
        }

        Ok(Self::Range { start, end })
    }

    /// 从行列表中取出选中的部分
    pub fn apply<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        match *self {
            RowSelection::All => rows,
            RowSelection::Test => &rows[..rows.len().min(TEST_MODE_ROWS)],
            RowSelection::Range { start, end } => {
                let from = (start - 1).min(rows.len());
                let to = end.unwrap_or(rows.len()).min(rows.len()).max(from);
                &rows[from..to]
            }
        }
    }

    /// 第一行的位置（从 1 开始）
    pub fn first_position(&self) -> usize {
        match *self {
            RowSelection::Range { start, .. } => start,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_range() {
        assert_eq!(
            RowSelection::parse_range("2-10").unwrap(),
            RowSelection::Range { start: 2, end: Some(10) }
        );
    }

    #[test]
    fn test_parse_open_range() {
        assert_eq!(
            RowSelection::parse_range("5").unwrap(),
            RowSelection::Range { start: 5, end: None }
        );
    }

    #[test]
    fn test_parse_invalid_range() {
        assert!(matches!(
            RowSelection::parse_range("a-b"),
            Err(RangeError::InvalidFormat(_))
        ));
        assert!(matches!(
            RowSelection::parse_range("3-"),
            Err(RangeError::InvalidFormat(_))
        ));
        assert!(matches!(
            RowSelection::parse_range(""),
            Err(RangeError::InvalidFormat(_))
        ));
        assert_eq!(
            RowSelection::parse_range("9-2"),
            Err(RangeError::StartAfterEnd { start: 9, end: 2 })
        );
        assert_eq!(RowSelection::parse_range("0-2"), Err(RangeError::ZeroStart(0)));
    }

    #[test]
    fn test_from_bounds() {
        assert_eq!(RowSelection::from_bounds(None, None).unwrap(), RowSelection::All);
        assert_eq!(
            RowSelection::from_bounds(None, Some(4)).unwrap(),
            RowSelection::Range { start: 1, end: Some(4) }
        );
    }

    #[test]
    fn test_apply() {
        let rows: Vec<u32> = (1..=10).collect();
        assert_eq!(RowSelection::All.apply(&rows).len(), 10);
        assert_eq!(RowSelection::Test.apply(&rows), &[1, 2, 3]);
        assert_eq!(
            RowSelection::Range { start: 2, end: Some(4) }.apply(&rows),
            &[2, 3, 4]
        );
        assert_eq!(
            RowSelection::Range { start: 9, end: None }.apply(&rows),
            &[9, 10]
        );
        assert!(RowSelection::Range { start: 20, end: Some(30) }.apply(&rows).is_empty());
    }

    #[test]
    fn test_test_mode_on_short_list() {
        let rows = vec![1, 2];
        assert_eq!(RowSelection::Test.apply(&rows), &[1, 2]);
    }
}
