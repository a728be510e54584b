use std::sync::{Arc, Mutex};

use rutest::config::RunConfig;
use rutest::runner::{Reporter, TestRunner};
use rutest::suite::{Test, TestOutcome, TestSuite};

const NAMES: [&str; 8] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

/// 记录实际执行顺序的探针
struct OrderProbe {
    order: Arc<Mutex<Vec<String>>>,
}

impl Reporter for OrderProbe {
    fn on_test_result(&mut self, test: &Test) {
        self.order.lock().unwrap().push(test.name().to_string());
    }
}

fn ordered_suite(suite_name: &str) -> TestSuite {
    let names: Vec<String> = NAMES.iter().map(|name| name.to_string()).collect();
    TestSuite::new(suite_name, move |s| {
        for name in names {
            s.add_test(name, |t| async move {
                t.that(true).is_true();
                Ok(())
            })?;
        }
        Ok(())
    })
    .unwrap()
}

async fn run_one_suite(config: RunConfig) -> Vec<String> {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut runner = TestRunner::new(config);
    runner.add_reporter(Box::new(OrderProbe {
        order: Arc::clone(&order),
    }));
    runner.add_suite(ordered_suite("shuffled"));
    runner.run().await.unwrap();

    let result = order.lock().unwrap().clone();
    result
}

fn registration_order() -> Vec<String> {
    NAMES.iter().map(|name| name.to_string()).collect()
}

/// 同一个种子复现同一个执行顺序
#[tokio::test]
async fn test_same_seed_reproduces_execution_order() {
    let config = RunConfig {
        random_order: true,
        seed: Some(1234),
        ..RunConfig::default()
    };
    let first = run_one_suite(config.clone()).await;
    let second = run_one_suite(config).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), NAMES.len());
}

/// 随机顺序确实会打乱注册顺序（逐个种子找，总有一个不一样）
#[tokio::test]
async fn test_random_order_departs_from_registration_order() {
    let registration = registration_order();
    let mut shuffled_seen = false;

    for seed in 1..=20 {
        let config = RunConfig {
            random_order: true,
            seed: Some(seed),
            ..RunConfig::default()
        };
        if run_one_suite(config).await != registration {
            shuffled_seen = true;
            break;
        }
    }
    assert!(shuffled_seen, "no seed in 1..=20 changed the order");
}

/// 关闭随机顺序时按注册顺序执行
#[tokio::test]
async fn test_disabled_random_order_keeps_registration_order() {
    let order = run_one_suite(RunConfig::default()).await;
    assert_eq!(order, registration_order());
}

/// 洗牌只影响执行顺序，注册顺序的视图保持不动
#[tokio::test]
async fn test_registration_order_view_is_untouched_by_shuffle() {
    let config = RunConfig {
        random_order: true,
        seed: Some(42),
        ..RunConfig::default()
    };
    let mut runner = TestRunner::new(config);
    runner.add_suite(ordered_suite("shuffled"));
    runner.run().await.unwrap();

    let names: Vec<&str> = runner.suites()[0]
        .tests()
        .iter()
        .map(|test| test.name())
        .collect();
    assert_eq!(names, NAMES.to_vec());
}

fn mixed_suite() -> TestSuite {
    TestSuite::new("mixed", |s| {
        s.add_test("adds up", |t| async move {
            t.that(2).is_equal_to(2);
            Ok(())
        })?;
        s.add_test("drifts", |t| async move {
            t.that(2).is_equal_to(3);
            Ok(())
        })?;
        s.add_test("blows up", |_t| async move {
            Err(anyhow::anyhow!("backend unreachable").into())
        })?;
        s.add_pending_test("not written yet")?;
        s.add_skipped_test("quarantined", |t| async move {
            t.that(true).is_true();
            Ok(())
        })?;
        Ok(())
    })
    .unwrap()
}

/// 洗牌只能改执行顺序，不能改结果归属：混合结果的套件在
/// 任何种子下计数和失败明细都相同
#[tokio::test]
async fn test_mixed_outcomes_keep_their_attribution_across_seeds() {
    for seed in [11, 97, 5403] {
        let config = RunConfig {
            random_order: true,
            fail_fast: true,
            seed: Some(seed),
            ..RunConfig::default()
        };
        let mut runner = TestRunner::new(config);
        runner.add_suite(mixed_suite());
        runner.add_suite(ordered_suite("behind the abort"));
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.total, 5, "seed {}", seed);
        assert_eq!(summary.passed, 1, "seed {}", seed);
        assert_eq!(summary.failures, 1, "seed {}", seed);
        assert_eq!(summary.errors, 1, "seed {}", seed);
        assert_eq!(summary.pending, 1, "seed {}", seed);
        assert_eq!(summary.skipped, 1, "seed {}", seed);

        let details: Vec<(&str, &str)> = summary
            .failure_details
            .iter()
            .map(|record| (record.suite.as_str(), record.test.as_str()))
            .collect();
        assert_eq!(details, [("mixed", "drifts"), ("mixed", "blows up")]);
        assert!(matches!(
            summary.failure_details[0].outcome,
            TestOutcome::Failure(_)
        ));
        assert!(matches!(
            summary.failure_details[1].outcome,
            TestOutcome::Error(_)
        ));

        // fail-fast 的边界是套件，不随失败测试洗到哪个位置移动
        assert!(summary.aborted, "seed {}", seed);
        assert_eq!(summary.suites[1].total, 0, "seed {}", seed);
    }
}

/// 同一次运行里不同套件的排列互不相关
#[tokio::test]
async fn test_suites_shuffle_independently() {
    let mut diverged = false;

    for seed in 1..=20 {
        let order = Arc::new(Mutex::new(Vec::new()));
        let config = RunConfig {
            random_order: true,
            seed: Some(seed),
            ..RunConfig::default()
        };
        let mut runner = TestRunner::new(config);
        runner.add_reporter(Box::new(OrderProbe {
            order: Arc::clone(&order),
        }));
        runner.add_suite(ordered_suite("first"));
        runner.add_suite(ordered_suite("second"));
        runner.run().await.unwrap();

        let all = order.lock().unwrap().clone();
        let (first, second) = all.split_at(NAMES.len());
        if first != second {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "suite orders never diverged for seeds 1..=20");
}
