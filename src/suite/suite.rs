use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::RutestError;
use crate::runner::context::RunContext;
use crate::runner::reporter::Reporter;
use crate::suite::test::{Test, TestHandle};
use crate::suite::types::{
    BoxedHookFuture, BoxedTestFuture, Hook, SuiteDefinition, TestBody, TestFlow,
};

/// 套件生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SuiteState {
    /// 已声明，定义体尚未求值
    Declared,
    /// 正在求值定义体（注册窗口）
    Evaluating,
    /// 正在执行测试
    Running,
    /// 已终结，计数可查询
    Finished,
}

/// 命名的测试集合，带可选的 before/after 钩子
///
/// 定义体在套件开始运行时才求值恰好一次，声明一个套件本身
/// 不触发任何用户代码
pub struct TestSuite {
    name: String,
    definition: Option<SuiteDefinition>,
    tests: Vec<Test>,
    before_hook: Option<Hook>,
    after_hook: Option<Hook>,
    state: SuiteState,
}

// 定义体、测试体和钩子都是装箱闭包，无法派生 Debug
impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("name", &self.name)
            .field("tests", &self.tests.len())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TestSuite {
    pub fn new<F>(name: impl Into<String>, definition: F) -> crate::Result<Self>
    where
        F: FnOnce(&mut TestSuite) -> crate::Result<()> + Send + 'static,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RutestError::Configuration(
                "suite name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            name,
            definition: Some(Box::new(definition)),
            tests: Vec::new(),
            before_hook: None,
            after_hook: None,
            state: SuiteState::Declared,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 注册顺序排列的测试，洗牌只影响执行顺序
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    /// 注册一个测试
    pub fn add_test<F, Fut>(&mut self, name: impl Into<String>, body: F) -> crate::Result<()>
    where
        F: Fn(TestHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestFlow> + Send + 'static,
    {
        let name = self.register_name(name.into())?;
        let boxed: TestBody = Box::new(move |handle| {
            let future: BoxedTestFuture = Box::pin(body(handle));
            future
        });
        self.tests.push(Test::new(name, Some(boxed), false));
        Ok(())
    }

    /// 注册一个尚无测试体的占位测试，结果记为 pending
    pub fn add_pending_test(&mut self, name: impl Into<String>) -> crate::Result<()> {
        let name = self.register_name(name.into())?;
        self.tests.push(Test::new(name, None, false));
        Ok(())
    }

    /// 注册但显式跳过：测试体和钩子都不会执行
    pub fn add_skipped_test<F, Fut>(
        &mut self,
        name: impl Into<String>,
        body: F,
    ) -> crate::Result<()>
    where
        F: Fn(TestHandle) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TestFlow> + Send + 'static,
    {
        let name = self.register_name(name.into())?;
        let boxed: TestBody = Box::new(move |handle| {
            let future: BoxedTestFuture = Box::pin(body(handle));
            future
        });
        self.tests.push(Test::new(name, Some(boxed), true));
        Ok(())
    }

    fn register_name(&self, name: String) -> crate::Result<String> {
        if matches!(self.state, SuiteState::Running | SuiteState::Finished) {
            return Err(RutestError::Configuration(format!(
                "suite '{}' already started running, tests can no longer be added",
                self.name
            )));
        }
        if name.trim().is_empty() {
            return Err(RutestError::Configuration(format!(
                "test name cannot be empty (suite '{}')",
                self.name
            )));
        }
        Ok(name)
    }

    /// 注册 before 钩子，每个测试执行前跑一次；一个套件至多一个
    pub fn before<F, Fut>(&mut self, hook: F) -> crate::Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.ensure_not_started()?;
        if self.before_hook.is_some() {
            return Err(RutestError::Configuration(format!(
                "suite '{}' already has a before hook",
                self.name
            )));
        }
        self.before_hook = Some(wrap_hook(hook));
        Ok(())
    }

    /// 注册 after 钩子，每个测试执行后跑一次；一个套件至多一个
    pub fn after<F, Fut>(&mut self, hook: F) -> crate::Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.ensure_not_started()?;
        if self.after_hook.is_some() {
            return Err(RutestError::Configuration(format!(
                "suite '{}' already has an after hook",
                self.name
            )));
        }
        self.after_hook = Some(wrap_hook(hook));
        Ok(())
    }

    fn ensure_not_started(&self) -> crate::Result<()> {
        if matches!(self.state, SuiteState::Running | SuiteState::Finished) {
            return Err(RutestError::Configuration(format!(
                "suite '{}' already started running, hooks can no longer be registered",
                self.name
            )));
        }
        Ok(())
    }

    /// 运行套件：求值定义体、决定执行顺序、安装钩子、逐个执行
    pub(crate) async fn run(
        &mut self,
        ctx: &mut RunContext,
        observers: &mut [Box<dyn Reporter>],
    ) -> crate::Result<()> {
        if self.state != SuiteState::Declared {
            return Err(RutestError::Configuration(format!(
                "suite '{}' has already run",
                self.name
            )));
        }

        for observer in observers.iter_mut() {
            observer.on_suite_start(self);
        }

        self.state = SuiteState::Evaluating;
        if let Some(definition) = self.definition.take() {
            definition(self)?;
        }
        debug!(suite = %self.name, tests = self.tests.len(), "suite definition evaluated");

        // 洗牌作用在下标排列上，注册顺序保持不动
        let mut order: Vec<usize> = (0..self.tests.len()).collect();
        if ctx.random_order() {
            let mut rng = StdRng::seed_from_u64(shuffle_seed(ctx.seed(), &self.name));
            order.shuffle(&mut rng);
        }

        ctx.install_hooks(self.before_hook.clone(), self.after_hook.clone());
        self.state = SuiteState::Running;

        let suite_name = self.name.clone();
        for index in order {
            self.tests[index].run(ctx, &suite_name).await;
            for observer in observers.iter_mut() {
                observer.on_test_result(&self.tests[index]);
            }
        }

        ctx.clear_hooks();
        self.state = SuiteState::Finished;

        for observer in observers.iter_mut() {
            observer.on_suite_finish(self);
        }

        if ctx.fail_fast() && self.has_failures_or_errors() {
            ctx.request_abort();
        }
        Ok(())
    }

    pub fn total_count(&self) -> usize {
        self.tests.len()
    }

    pub fn success_count(&self) -> usize {
        self.tests.iter().filter(|t| t.is_success()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.tests.iter().filter(|t| t.is_pending()).count()
    }

    pub fn errors_count(&self) -> usize {
        self.tests.iter().filter(|t| t.is_error()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.tests.iter().filter(|t| t.is_skipped()).count()
    }

    pub fn failures_count(&self) -> usize {
        self.total_count()
            - self.success_count()
            - self.pending_count()
            - self.errors_count()
            - self.skipped_count()
    }

    pub fn has_failures_or_errors(&self) -> bool {
        self.tests.iter().any(|t| t.is_failure() || t.is_error())
    }
}

fn wrap_hook<F, Fut>(hook: F) -> Hook
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move || {
        let future: BoxedHookFuture = Box::pin(hook());
        future
    })
}

/// 同一种子加同名套件得到同一排列，不同套件的排列互不相关
fn shuffle_seed(seed: u64, suite_name: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    suite_name.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_suite_name_is_rejected() {
        assert!(TestSuite::new("", |_| Ok(())).is_err());
        assert!(TestSuite::new("  ", |_| Ok(())).is_err());
    }

    #[test]
    fn test_empty_test_name_is_rejected() {
        let mut suite = TestSuite::new("s", |_| Ok(())).unwrap();
        let result = suite.add_test("", |t| async move {
            t.that(1).is_equal_to(1);
            Ok(())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_hooks_are_rejected() {
        let mut suite = TestSuite::new("s", |_| Ok(())).unwrap();
        suite.before(|| async { Ok(()) }).unwrap();
        let error = suite.before(|| async { Ok(()) }).unwrap_err();
        assert!(error.to_string().contains("before"));

        suite.after(|| async { Ok(()) }).unwrap();
        assert!(suite.after(|| async { Ok(()) }).is_err());
    }

    #[test]
    fn test_registration_is_rejected_after_start() {
        let mut suite = TestSuite::new("s", |_| Ok(())).unwrap();
        suite.state = SuiteState::Running;

        let result = suite.add_test("late", |t| async move {
            t.that(1).is_equal_to(1);
            Ok(())
        });
        assert!(result.is_err());
        assert!(suite.before(|| async { Ok(()) }).is_err());

        suite.state = SuiteState::Finished;
        assert!(suite.add_pending_test("too late").is_err());
    }

    #[test]
    fn test_declaration_does_not_evaluate_definition() {
        // 定义体里直接 panic；只要 new 不触发它就不会炸
        let suite = TestSuite::new("s", |_| panic!("must stay unevaluated")).unwrap();
        assert_eq!(suite.total_count(), 0);
    }

    #[test]
    fn test_shuffle_seed_is_stable_per_suite() {
        assert_eq!(shuffle_seed(7, "alpha"), shuffle_seed(7, "alpha"));
        assert_ne!(shuffle_seed(7, "alpha"), shuffle_seed(7, "beta"));
        assert_ne!(shuffle_seed(7, "alpha"), shuffle_seed(8, "alpha"));
    }
}
