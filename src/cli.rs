use clap::Parser;

use crate::config::{ConfigLoader, RunConfig};
use crate::i18n::Language;

/// 测试二进制的命令行选项
///
/// 框架本身不带可执行文件；消费方的测试二进制自行解析参数，
/// 叠加到配置文件之上:
///
/// ```ignore
/// let config = rutest::cli::CliOptions::parse().into_config();
/// let mut runner = rutest::runner::TestRunner::new(config);
/// ```
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliOptions {
    /// 出现失败的套件跑完后停止运行剩余套件
    #[arg(long)]
    pub fail_fast: bool,

    /// 随机化每个套件内测试的执行顺序
    #[arg(long)]
    pub random_order: bool,

    /// 洗牌种子，用于复现某次随机顺序
    #[arg(long)]
    pub seed: Option<u64>,

    /// 名称过滤（正则），匹配套件名或测试名
    #[arg(long)]
    pub filter: Option<String>,

    /// 报告语言
    #[arg(long, value_enum)]
    pub language: Option<Language>,
}

impl CliOptions {
    /// 叠加到基础配置之上，命令行优先
    pub fn apply_to(self, mut config: RunConfig) -> RunConfig {
        if self.fail_fast {
            config.fail_fast = true;
        }
        if self.random_order {
            config.random_order = true;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(filter) = self.filter {
            config.filter = Some(filter);
        }
        if let Some(language) = self.language {
            config.language = language;
        }
        config
    }

    /// 查找配置文件并叠加命令行覆盖
    pub fn into_config(self) -> RunConfig {
        self.apply_to(ConfigLoader::find_and_load())
    }
}
