use rutest::assertion::AssertValue;
use rutest::config::RunConfig;
use rutest::i18n::{Language, Translator};
use rutest::runner::TestRunner;
use rutest::suite::{OutcomeDetail, OutcomeMessage, TestOutcome, TestSuite};

/// 取出第 index 个测试的非成功明细
fn detail_of(runner: &TestRunner, index: usize) -> OutcomeDetail {
    let outcome = runner.suites()[0].tests()[index]
        .outcome()
        .expect("test should have finished");
    match outcome {
        TestOutcome::Failure(detail) | TestOutcome::Error(detail) => detail.clone(),
        other => panic!("expected failure or error, got {:?}", other),
    }
}

fn render_en(detail: &OutcomeDetail) -> String {
    match &detail.message {
        OutcomeMessage::Keyed(message) => Translator::new(Language::En).translate(message),
        OutcomeMessage::Plain(text) => text.clone(),
    }
}

/// 基本类型同一性按值判定，复合值同一性按共享分配判定
#[tokio::test]
async fn test_identity_semantics_through_public_api() {
    let suite = TestSuite::new("identity", |s| {
        s.add_test("primitive identity holds", |t| async move {
            t.that(42).is_identical_to(42);
            Ok(())
        })?;
        s.add_test("separate composites are not identical", |t| async move {
            t.that(AssertValue::list([1, 2, 3]))
                .is_identical_to(AssertValue::list([1, 2, 3]));
            Ok(())
        })?;
        s.add_test("shared composite is identical to itself", |t| async move {
            let shared = AssertValue::list([1, 2, 3]);
            t.that(shared.clone()).is_identical_to(shared);
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();

    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failures, 1);

    // 失败消息把两边的渲染文本都点出来
    let detail = detail_of(&runner, 1);
    assert_eq!(
        render_en(&detail),
        "expected [ 1, 2, 3 ] to be identical to [ 1, 2, 3 ]"
    );
    assert!(detail.location.is_some());
}

/// 两个缺失值之间的同一性是不可判定的失败，两个方向都一样
#[tokio::test]
async fn test_absent_identity_is_indeterminate_both_ways() {
    let suite = TestSuite::new("absent identity", |s| {
        s.add_test("identical direction", |t| async move {
            t.that(None::<i32>).is_identical_to(None::<i32>);
            Ok(())
        })?;
        s.add_test("not identical direction", |t| async move {
            t.that(None::<i32>).is_not_identical_to(None::<i32>);
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();

    assert_eq!(summary.failures, 2);
    for index in 0..2 {
        assert_eq!(
            render_en(&detail_of(&runner, index)),
            "identity comparison of two absent values is undetermined"
        );
    }
}

/// 深相等对结构相同的复合值成立，同一性不成立
#[tokio::test]
async fn test_deep_equality_versus_identity() {
    let suite = TestSuite::new("equality", |s| {
        s.add_test("structurally equal objects are equal", |t| async move {
            t.that(serde_json::json!({ "id": 7, "tags": ["a", "b"] }))
                .is_equal_to(serde_json::json!({ "tags": ["a", "b"], "id": 7 }));
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();
    assert_eq!(summary.passed, 1);
}

/// 正则断言：命中通过，不命中的失败消息引用两边
#[tokio::test]
async fn test_match_assertion_messages() {
    let suite = TestSuite::new("matching", |s| {
        s.add_test("hello matches", |t| async move {
            t.that("hello").matches("ll");
            Ok(())
        })?;
        s.add_test("goodbye does not", |t| async move {
            t.that("goodbye").matches("ll");
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();

    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(
        render_en(&detail_of(&runner, 1)),
        "expected \"goodbye\" to match /ll/"
    );
}

/// 被断言的字符串本身含有 `{1}` 字样时渲染原样输出，
/// 不会被当作占位符再替换一次
#[tokio::test]
async fn test_subject_containing_placeholder_text_renders_verbatim() {
    let suite = TestSuite::new("braces", |s| {
        s.add_test("template literal stays verbatim", |t| async move {
            t.that("{1}").is_equal_to("x");
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();
    assert_eq!(summary.failures, 1);

    assert_eq!(
        render_en(&detail_of(&runner, 0)),
        "expected \"{1}\" to be equal to \"x\""
    );
}

/// 显式失败带调用位置；fail_with 用自由文本
#[tokio::test]
async fn test_explicit_fail_carries_location() {
    let suite = TestSuite::new("explicit", |s| {
        s.add_test("fails by default message", |t| async move {
            t.fail();
            Ok(())
        })?;
        s.add_test("fails with custom message", |t| async move {
            t.fail_with("ledger drifted by 3 cents");
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();
    assert_eq!(summary.failures, 2);

    let default_detail = detail_of(&runner, 0);
    assert_eq!(render_en(&default_detail), "explicitly failed");
    let location = default_detail.location.expect("fail() records its call site");
    assert!(location.file.ends_with("assertion_messages_test.rs"));

    assert_eq!(render_en(&detail_of(&runner, 1)), "ledger drifted by 3 cents");
}

/// 代码块断言：捕获错误并与期望消息比对
#[tokio::test]
async fn test_code_block_assertions() {
    fn withdraw(balance: i64, amount: i64) -> anyhow::Result<()> {
        if amount > balance {
            anyhow::bail!("insufficient funds");
        }
        Ok(())
    }

    let suite = TestSuite::new("raising", |s| {
        s.add_test("raises on overdraft", |t| async move {
            t.running(|| withdraw(10, 100)).raises("insufficient funds");
            Ok(())
        })?;
        s.add_test("quiet when covered", |t| async move {
            t.running(|| withdraw(100, 10)).does_not_raise();
            Ok(())
        })?;
        s.add_test("wrong expectation fails", |t| async move {
            t.running(|| withdraw(10, 100)).raises("card expired");
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    let summary = runner.run().await.unwrap();

    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failures, 1);
    assert_eq!(
        render_en(&detail_of(&runner, 2)),
        "expected the code to raise \"card expired\" but it raised \"insufficient funds\""
    );
}

/// 同一个失败消息在中文目录下渲染为中文
#[tokio::test]
async fn test_failure_message_renders_in_chinese() {
    let suite = TestSuite::new("zh", |s| {
        s.add_test("one is not two", |t| async move {
            t.that(1).is_equal_to(2);
            Ok(())
        })?;
        Ok(())
    })
    .unwrap();

    let mut runner = TestRunner::new(RunConfig::default());
    runner.add_suite(suite);
    runner.run().await.unwrap();

    let detail = detail_of(&runner, 0);
    let OutcomeMessage::Keyed(message) = &detail.message else {
        panic!("expected a keyed message");
    };
    assert_eq!(
        Translator::new(Language::Zh).translate(message),
        "期望 1 等于 2"
    );
    assert_eq!(
        Translator::new(Language::En).translate(message),
        "expected 1 to be equal to 2"
    );
}
