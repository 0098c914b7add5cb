//! 命令行参数

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::article::{RangeError, RowSelection};

/// 公众号文章批量转音频
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认搜索 tingwen.toml / tingwen.local.toml）
    #[arg(long, global = true, env = "TINGWEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 抓取、清理、合成并混入背景音乐
    Convert {
        #[command(flatten)]
        rows: RowArgs,

        /// 不混入背景音乐
        #[arg(long)]
        no_bgm: bool,

        /// 覆盖配置中的语音
        #[arg(long)]
        voice: Option<String>,
    },
    /// 只抓取并保存清理后的正文，输出失败清单
    Fetch {
        #[command(flatten)]
        rows: RowArgs,
    },
    /// 为配音目录中已有的配音混入背景音乐
    Mix,
}

/// 表格与行选择
#[derive(Args, Debug, Clone)]
pub struct RowArgs {
    /// 文章列表（.xlsx / .xls / .csv）
    pub excel: PathBuf,

    /// 测试模式，只处理前 3 行
    #[arg(long, conflicts_with_all = ["range", "start", "end"])]
    pub test: bool,

    /// 行范围 START-END（从 1 开始，闭区间）
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub range: Option<String>,

    /// 起始行
    #[arg(long)]
    pub start: Option<usize>,

    /// 结束行
    #[arg(long)]
    pub end: Option<usize>,
}

impl RowArgs {
    pub fn selection(&self) -> Result<RowSelection, RangeError> {
        if self.test {
            return Ok(RowSelection::Test);
        }
        match &self.range {
            Some(spec) => RowSelection::parse_range(spec),
            None => RowSelection::from_bounds(self.start, self.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tingwen").chain(args.iter().copied())).unwrap()
    }

    fn rows(cli: Cli) -> RowArgs {
        match cli.command {
            Command::Convert { rows, .. } | Command::Fetch { rows } => rows,
            Command::Mix => panic!("mix has no rows"),
        }
    }

    #[test]
    fn test_convert_flags() {
        let cli = parse(&["convert", "list.xlsx", "--no-bgm", "--voice", "zh-CN-YunxiNeural"]);
        match cli.command {
            Command::Convert { rows, no_bgm, voice } => {
                assert_eq!(rows.excel, PathBuf::from("list.xlsx"));
                assert!(no_bgm);
                assert_eq!(voice.as_deref(), Some("zh-CN-YunxiNeural"));
                assert_eq!(rows.selection().unwrap(), RowSelection::All);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_selection_modes() {
        assert_eq!(
            rows(parse(&["fetch", "a.csv", "--test"])).selection().unwrap(),
            RowSelection::Test
        );
        assert_eq!(
            rows(parse(&["fetch", "a.csv", "--range", "2-4"])).selection().unwrap(),
            RowSelection::Range { start: 2, end: Some(4) }
        );
        assert_eq!(
            rows(parse(&["convert", "a.csv", "--start", "5"])).selection().unwrap(),
            RowSelection::Range { start: 5, end: None }
        );
    }

    #[test]
    fn test_invalid_range_is_error() {
        assert!(rows(parse(&["fetch", "a.csv", "--range", "9-3"])).selection().is_err());
        assert!(rows(parse(&["fetch", "a.csv", "--range", "x"])).selection().is_err());
    }

    #[test]
    fn test_conflicting_modes_rejected() {
        let result = Cli::try_parse_from(["tingwen", "fetch", "a.csv", "--test", "--range", "1-2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = parse(&["mix", "--config", "custom.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(cli.command, Command::Mix));
    }
}
