use std::time::Duration;

use crate::suite::TestSuite;
use crate::suite::types::TestOutcome;

/// 单个失败或错误测试的明细
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub suite: String,
    pub test: String,
    pub outcome: TestOutcome,
}

/// 单个套件的计数
#[derive(Debug, Clone)]
pub struct SuiteSummary {
    pub name: String,
    pub total: usize,
    pub passed: usize,
    pub failures: usize,
    pub errors: usize,
    pub pending: usize,
    pub skipped: usize,
}

/// 一次完整运行的汇总
///
/// 对套件集合的纯派生查询：没有独立维护的计数器，不会和
/// 真实结果漂移
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failures: usize,
    pub errors: usize,
    pub pending: usize,
    pub skipped: usize,

    /// 整次运行的墙钟耗时
    pub duration: Duration,

    /// fail-fast 是否中止了后续套件
    pub aborted: bool,

    /// 每个已注册套件的计数，按注册顺序；被 fail-fast 截掉的
    /// 套件计数全为零
    pub suites: Vec<SuiteSummary>,

    /// 失败与错误明细，按套件顺序、套件内注册顺序
    pub failure_details: Vec<FailureRecord>,
}

impl RunSummary {
    pub fn from_suites(suites: &[TestSuite], duration: Duration) -> Self {
        let mut summary = Self {
            total: 0,
            passed: 0,
            failures: 0,
            errors: 0,
            pending: 0,
            skipped: 0,
            duration,
            aborted: false,
            suites: Vec::new(),
            failure_details: Vec::new(),
        };

        for suite in suites {
            let per_suite = SuiteSummary {
                name: suite.name().to_string(),
                total: suite.total_count(),
                passed: suite.success_count(),
                failures: suite.failures_count(),
                errors: suite.errors_count(),
                pending: suite.pending_count(),
                skipped: suite.skipped_count(),
            };
            summary.total += per_suite.total;
            summary.passed += per_suite.passed;
            summary.failures += per_suite.failures;
            summary.errors += per_suite.errors;
            summary.pending += per_suite.pending;
            summary.skipped += per_suite.skipped;
            summary.suites.push(per_suite);

            for test in suite.tests() {
                let Some(outcome) = test.outcome() else {
                    continue;
                };
                if matches!(outcome, TestOutcome::Failure(_) | TestOutcome::Error(_)) {
                    summary.failure_details.push(FailureRecord {
                        suite: suite.name().to_string(),
                        test: test.name().to_string(),
                        outcome: outcome.clone(),
                    });
                }
            }
        }

        summary
    }

    pub fn has_errors_or_failures(&self) -> bool {
        !self.failure_details.is_empty()
    }
}
