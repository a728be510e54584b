use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::RutestError;
use crate::runner::context::{RunContext, TestFilter};
use crate::runner::reporter::Reporter;
use crate::runner::types::RunSummary;
use crate::suite::TestSuite;
use crate::suite::test::Test;

/// 测试运行器
///
/// 持有显式的套件注册表，按注册顺序依次运行。一个实例只能
/// 运行一次，结果在运行后通过聚合查询读取
pub struct TestRunner {
    suites: Vec<TestSuite>,
    config: RunConfig,
    reporters: Vec<Box<dyn Reporter>>,
    filter_override: Option<TestFilter>,
    finished: bool,
}

impl TestRunner {
    pub fn new(config: RunConfig) -> Self {
        Self {
            suites: Vec::new(),
            config,
            reporters: Vec::new(),
            filter_override: None,
            finished: false,
        }
    }

    /// 注册一个套件
    pub fn add_suite(&mut self, suite: TestSuite) {
        self.suites.push(suite);
    }

    /// 挂一个运行观察者
    pub fn add_reporter(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    /// 用程序化谓词替代配置里的名称过滤
    pub fn set_filter(&mut self, filter: TestFilter) {
        self.filter_override = Some(filter);
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    /// 依次运行所有套件并返回汇总
    ///
    /// fail-fast 只在套件边界检查：出事的套件自身跑完，后续
    /// 套件整体不再启动
    pub async fn run(&mut self) -> crate::Result<RunSummary> {
        if self.finished {
            return Err(RutestError::Configuration(
                "runner has already run, results are frozen".to_string(),
            ));
        }

        let filter = match self.filter_override.take() {
            Some(filter) => Some(filter),
            None => match &self.config.filter {
                Some(pattern) => Some(TestFilter::pattern(pattern)?),
                None => None,
            },
        };

        // 未指定种子时现生成一个并写日志，方便复现
        let seed = match self.config.seed {
            Some(seed) => seed,
            None => rand::random(),
        };
        if self.config.random_order {
            info!(seed, "random test order enabled, reuse the seed to reproduce this run");
        }

        let mut ctx = RunContext::new(self.config.fail_fast, self.config.random_order, seed, filter);

        for reporter in &mut self.reporters {
            reporter.on_run_start();
        }

        let started = Instant::now();
        let mut aborted = false;
        for suite in &mut self.suites {
            if ctx.abort_requested() {
                warn!("fail-fast abort requested, remaining suites will not run");
                aborted = true;
                break;
            }
            debug!(suite = %suite.name(), "running suite");
            suite.run(&mut ctx, &mut self.reporters).await?;
        }

        let mut summary = RunSummary::from_suites(&self.suites, started.elapsed());
        summary.aborted = aborted;
        self.finished = true;

        for reporter in &mut self.reporters {
            reporter.on_run_finish(&summary);
        }
        Ok(summary)
    }

    pub fn total_count(&self) -> usize {
        self.suites.iter().map(TestSuite::total_count).sum()
    }

    pub fn success_count(&self) -> usize {
        self.suites.iter().map(TestSuite::success_count).sum()
    }

    pub fn failures_count(&self) -> usize {
        self.suites.iter().map(TestSuite::failures_count).sum()
    }

    pub fn errors_count(&self) -> usize {
        self.suites.iter().map(TestSuite::errors_count).sum()
    }

    pub fn pending_count(&self) -> usize {
        self.suites.iter().map(TestSuite::pending_count).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.suites.iter().map(TestSuite::skipped_count).sum()
    }

    /// 失败与错误的测试，按套件顺序、套件内注册顺序
    pub fn failures_and_errors(&self) -> Vec<&Test> {
        self.suites
            .iter()
            .flat_map(|suite| {
                suite
                    .tests()
                    .iter()
                    .filter(|test| test.is_failure() || test.is_error())
            })
            .collect()
    }

    pub fn has_errors_or_failures(&self) -> bool {
        self.suites.iter().any(TestSuite::has_failures_or_errors)
    }
}
