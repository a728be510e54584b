use serde::Deserialize;

use crate::i18n::Language;

/// 一次运行的配置
///
/// 运行器启动时取一份快照，运行过程中只读
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// 出现失败或错误的套件跑完后，不再启动后续套件
    pub fail_fast: bool,

    /// 随机化每个套件内的执行顺序
    pub random_order: bool,

    /// 洗牌种子；缺省时每次运行随机生成并写日志
    pub seed: Option<u64>,

    /// 名称过滤（正则），匹配套件名或测试名的测试才运行
    pub filter: Option<String>,

    /// 报告语言
    pub language: Language,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            random_order: false,
            seed: None,
            filter: None,
            language: Language::En,
        }
    }
}
