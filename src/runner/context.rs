use std::sync::Arc;

use regex::Regex;

use crate::suite::types::Hook;

/// 测试过滤器：决定一个已注册的测试要不要真的执行
///
/// 被排除的测试记为 skipped，仍然出现在结果里
pub enum TestFilter {
    /// 正则模式，匹配套件名或测试名即运行
    Pattern(Regex),
    /// 外部谓词 (套件名, 测试名) -> 是否运行
    Predicate(Arc<dyn Fn(&str, &str) -> bool + Send + Sync>),
}

impl TestFilter {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(TestFilter::Pattern(Regex::new(pattern)?))
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        TestFilter::Predicate(Arc::new(predicate))
    }

    fn should_run(&self, suite_name: &str, test_name: &str) -> bool {
        match self {
            TestFilter::Pattern(regex) => {
                regex.is_match(suite_name) || regex.is_match(test_name)
            }
            TestFilter::Predicate(predicate) => predicate(suite_name, test_name),
        }
    }
}

/// 贯穿一次运行的上下文
///
/// 持有运行配置的快照、当前套件的钩子和 fail-fast 中止标志。
/// 钩子由套件在进入时安装、离开时清除
pub struct RunContext {
    fail_fast: bool,
    random_order: bool,
    seed: u64,
    abort_requested: bool,
    filter: Option<TestFilter>,
    before_hook: Option<Hook>,
    after_hook: Option<Hook>,
}

impl RunContext {
    pub(crate) fn new(
        fail_fast: bool,
        random_order: bool,
        seed: u64,
        filter: Option<TestFilter>,
    ) -> Self {
        Self {
            fail_fast,
            random_order,
            seed,
            abort_requested: false,
            filter,
            before_hook: None,
            after_hook: None,
        }
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn random_order(&self) -> bool {
        self.random_order
    }

    /// 本次运行的洗牌种子，随机顺序关闭时也有值但不被使用
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn abort_requested(&self) -> bool {
        self.abort_requested
    }

    pub(crate) fn request_abort(&mut self) {
        self.abort_requested = true;
    }

    pub(crate) fn install_hooks(&mut self, before: Option<Hook>, after: Option<Hook>) {
        self.before_hook = before;
        self.after_hook = after;
    }

    pub(crate) fn clear_hooks(&mut self) {
        self.before_hook = None;
        self.after_hook = None;
    }

    pub(crate) fn before_hook(&self) -> Option<Hook> {
        self.before_hook.clone()
    }

    pub(crate) fn after_hook(&self) -> Option<Hook> {
        self.after_hook.clone()
    }

    pub(crate) fn should_run(&self, suite_name: &str, test_name: &str) -> bool {
        match &self.filter {
            Some(filter) => filter.should_run(suite_name, test_name),
            None => true,
        }
    }
}
