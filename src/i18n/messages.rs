use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// 稳定的消息键常量
///
/// 核心只产生 key + 位置参数，渲染成人类可读文本由 [`Translator`] 负责
pub mod keys {
    pub const EQUALITY_BE_EQUAL_TO: &str = "equality_assertion_be_equal_to";
    pub const EQUALITY_BE_NOT_EQUAL_TO: &str = "equality_assertion_be_not_equal_to";
    pub const IDENTITY_BE_IDENTICAL_TO: &str = "identity_assertion_be_identical_to";
    pub const IDENTITY_BE_NOT_IDENTICAL_TO: &str = "identity_assertion_be_not_identical_to";
    pub const IDENTITY_UNDETERMINED: &str = "identity_assertion_undetermined";
    pub const MATCH_TO_MATCH: &str = "match_assertion_match";
    pub const TRUTHINESS_BE_TRUE: &str = "truthiness_assertion_be_true";
    pub const TRUTHINESS_BE_FALSE: &str = "truthiness_assertion_be_false";
    pub const INCLUSION_INCLUDE: &str = "inclusion_assertion_include";
    pub const INCLUSION_NOT_INCLUDE: &str = "inclusion_assertion_not_include";
    pub const INCLUSION_INCLUDE_EXACTLY: &str = "inclusion_assertion_include_exactly";
    pub const INCLUSION_BE_EMPTY: &str = "inclusion_assertion_be_empty";
    pub const INCLUSION_BE_NOT_EMPTY: &str = "inclusion_assertion_be_not_empty";
    pub const NUMERIC_BE_GREATER_THAN: &str = "numeric_assertion_be_greater_than";
    pub const NUMERIC_BE_GREATER_OR_EQUAL: &str = "numeric_assertion_be_greater_or_equal_to";
    pub const NUMERIC_BE_LESS_THAN: &str = "numeric_assertion_be_less_than";
    pub const NUMERIC_BE_LESS_OR_EQUAL: &str = "numeric_assertion_be_less_or_equal_to";
    pub const NUMERIC_BE_NEAR_TO: &str = "numeric_assertion_be_near_to";
    pub const EXCEPTION_RAISE: &str = "exception_assertion_raise";
    pub const EXCEPTION_NOTHING_RAISED: &str = "exception_assertion_nothing_raised";
    pub const EXCEPTION_NOT_RAISE: &str = "exception_assertion_not_raise";
    pub const EXPLICITLY_FAILED: &str = "explicitly_failed";
    pub const TEST_DID_NOT_ASSERT: &str = "test_did_not_assert";
    pub const PENDING_NO_REASON: &str = "pending_no_reason";
    pub const RUN_STARTED: &str = "run_started";
    pub const SUITE_STARTED: &str = "suite_started";
    pub const TEST_SKIPPED_SUFFIX: &str = "test_skipped_suffix";
    pub const SUMMARY_TITLE: &str = "summary_title";
    pub const SUMMARY_TESTS: &str = "summary_tests";
    pub const SUMMARY_DURATION: &str = "summary_duration";
    pub const SUMMARY_FAILURES_TITLE: &str = "summary_failures_title";
    pub const RUN_NO_TESTS: &str = "run_no_tests";
    pub const FAIL_FAST_ABORTED: &str = "fail_fast_aborted";
}

/// 英文消息目录（默认语言，也是缺键时的回退目录）
static EN: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (keys::EQUALITY_BE_EQUAL_TO, "expected {0} to be equal to {1}"),
        (keys::EQUALITY_BE_NOT_EQUAL_TO, "expected {0} to be not equal to {1}"),
        (keys::IDENTITY_BE_IDENTICAL_TO, "expected {0} to be identical to {1}"),
        (keys::IDENTITY_BE_NOT_IDENTICAL_TO, "expected {0} to be not identical to {1}"),
        (
            keys::IDENTITY_UNDETERMINED,
            "identity comparison of two absent values is undetermined",
        ),
        (keys::MATCH_TO_MATCH, "expected {0} to match {1}"),
        (keys::TRUTHINESS_BE_TRUE, "expected {0} to be true"),
        (keys::TRUTHINESS_BE_FALSE, "expected {0} to be false"),
        (keys::INCLUSION_INCLUDE, "expected {0} to include {1}"),
        (keys::INCLUSION_NOT_INCLUDE, "expected {0} to not include {1}"),
        (keys::INCLUSION_INCLUDE_EXACTLY, "expected {0} to include exactly {1}"),
        (keys::INCLUSION_BE_EMPTY, "expected {0} to be empty"),
        (keys::INCLUSION_BE_NOT_EMPTY, "expected {0} to be not empty"),
        (keys::NUMERIC_BE_GREATER_THAN, "expected {0} to be greater than {1}"),
        (
            keys::NUMERIC_BE_GREATER_OR_EQUAL,
            "expected {0} to be greater than or equal to {1}",
        ),
        (keys::NUMERIC_BE_LESS_THAN, "expected {0} to be less than {1}"),
        (
            keys::NUMERIC_BE_LESS_OR_EQUAL,
            "expected {0} to be less than or equal to {1}",
        ),
        (
            keys::NUMERIC_BE_NEAR_TO,
            "expected {0} to be near {1} (within {2} decimal places)",
        ),
        (keys::EXCEPTION_RAISE, "expected the code to raise {0} but it raised {1}"),
        (
            keys::EXCEPTION_NOTHING_RAISED,
            "expected the code to raise {0} but nothing was raised",
        ),
        (keys::EXCEPTION_NOT_RAISE, "expected the code not to raise but it raised {0}"),
        (keys::EXPLICITLY_FAILED, "explicitly failed"),
        (keys::TEST_DID_NOT_ASSERT, "test did not assert anything"),
        (keys::PENDING_NO_REASON, "work in progress"),
        (keys::RUN_STARTED, "starting test run"),
        (keys::SUITE_STARTED, "running suite: {0}"),
        (keys::TEST_SKIPPED_SUFFIX, "(skipped)"),
        (keys::SUMMARY_TITLE, "Summary"),
        (
            keys::SUMMARY_TESTS,
            "{0} passed, {1} failures, {2} errors, {3} pending, {4} skipped, {5} total",
        ),
        (keys::SUMMARY_DURATION, "duration: {0}s"),
        (keys::SUMMARY_FAILURES_TITLE, "failures and errors"),
        (keys::RUN_NO_TESTS, "no suites or tests were registered, nothing to run"),
        (keys::FAIL_FAST_ABORTED, "fail-fast enabled, remaining suites were not run"),
    ])
});

/// 中文消息目录
static ZH: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (keys::EQUALITY_BE_EQUAL_TO, "期望 {0} 等于 {1}"),
        (keys::EQUALITY_BE_NOT_EQUAL_TO, "期望 {0} 不等于 {1}"),
        (keys::IDENTITY_BE_IDENTICAL_TO, "期望 {0} 与 {1} 是同一个值"),
        (keys::IDENTITY_BE_NOT_IDENTICAL_TO, "期望 {0} 与 {1} 不是同一个值"),
        (keys::IDENTITY_UNDETERMINED, "两个缺失值之间的同一性比较没有意义"),
        (keys::MATCH_TO_MATCH, "期望 {0} 匹配 {1}"),
        (keys::TRUTHINESS_BE_TRUE, "期望 {0} 为 true"),
        (keys::TRUTHINESS_BE_FALSE, "期望 {0} 为 false"),
        (keys::INCLUSION_INCLUDE, "期望 {0} 包含 {1}"),
        (keys::INCLUSION_NOT_INCLUDE, "期望 {0} 不包含 {1}"),
        (keys::INCLUSION_INCLUDE_EXACTLY, "期望 {0} 恰好包含 {1}"),
        (keys::INCLUSION_BE_EMPTY, "期望 {0} 为空"),
        (keys::INCLUSION_BE_NOT_EMPTY, "期望 {0} 不为空"),
        (keys::NUMERIC_BE_GREATER_THAN, "期望 {0} 大于 {1}"),
        (keys::NUMERIC_BE_GREATER_OR_EQUAL, "期望 {0} 大于或等于 {1}"),
        (keys::NUMERIC_BE_LESS_THAN, "期望 {0} 小于 {1}"),
        (keys::NUMERIC_BE_LESS_OR_EQUAL, "期望 {0} 小于或等于 {1}"),
        (keys::NUMERIC_BE_NEAR_TO, "期望 {0} 接近 {1}（{2} 位小数以内）"),
        (keys::EXCEPTION_RAISE, "期望代码抛出 {0}，但实际抛出 {1}"),
        (keys::EXCEPTION_NOTHING_RAISED, "期望代码抛出 {0}，但什么都没有抛出"),
        (keys::EXCEPTION_NOT_RAISE, "期望代码不抛出异常，但抛出了 {0}"),
        (keys::EXPLICITLY_FAILED, "显式标记为失败"),
        (keys::TEST_DID_NOT_ASSERT, "测试没有做任何断言"),
        (keys::PENDING_NO_REASON, "仍在开发中"),
        (keys::RUN_STARTED, "开始运行测试"),
        (keys::SUITE_STARTED, "运行测试套件: {0}"),
        (keys::TEST_SKIPPED_SUFFIX, "(已跳过)"),
        (keys::SUMMARY_TITLE, "总结"),
        (
            keys::SUMMARY_TESTS,
            "{0} 通过, {1} 失败, {2} 错误, {3} 待定, {4} 跳过, 共 {5} 个",
        ),
        (keys::SUMMARY_DURATION, "耗时: {0}s"),
        (keys::SUMMARY_FAILURES_TITLE, "失败与错误"),
        (keys::RUN_NO_TESTS, "没有注册任何套件或测试，无事可做"),
        (keys::FAIL_FAST_ABORTED, "fail-fast 已启用，剩余套件未运行"),
    ])
});

/// 输出语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

impl Language {
    fn catalog(self) -> &'static HashMap<&'static str, &'static str> {
        match self {
            Language::En => &EN,
            Language::Zh => &ZH,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::Zh => write!(f, "zh"),
        }
    }
}

/// 结构化消息：稳定的 key + 位置参数
///
/// 核心产生的所有非自由文本都走这个类型，渲染被推迟到报告阶段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub key: &'static str,
    pub args: Vec<String>,
}

impl Message {
    pub fn new(key: &'static str, args: Vec<String>) -> Self {
        Self { key, args }
    }

    /// 无参数消息
    pub fn plain_key(key: &'static str) -> Self {
        Self { key, args: Vec::new() }
    }
}

/// 把 [`Message`] 渲染为目标语言文本
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// 渲染消息；所选语言缺键时回退英文，英文也缺键时原样输出 key
    pub fn translate(&self, message: &Message) -> String {
        let pattern = self
            .language
            .catalog()
            .get(message.key)
            .or_else(|| EN.get(message.key))
            .copied()
            .unwrap_or(message.key);

        substitute(pattern, &message.args)
    }

    /// 直接按 key 渲染（无参数的报告文案）
    pub fn text(&self, key: &'static str) -> String {
        self.translate(&Message::plain_key(key))
    }
}

/// 替换 `{0}`、`{1}` 形式的位置占位符
///
/// 对模板单遍扫描，参数文本只被输出、从不被再次扫描，
/// 因此参数里出现 `{N}` 字样也不会被当作占位符
fn substitute(pattern: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        rest = &rest[open..];
        let Some(close) = rest.find('}') else {
            break;
        };
        match rest[1..close].parse::<usize>() {
            Ok(index) if index < args.len() => {
                out.push_str(&args[index]);
                rest = &rest[close + 1..];
            }
            // 不是合法占位符，保留 `{` 继续往后扫
            _ => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_with_args() {
        let translator = Translator::new(Language::En);
        let message = Message::new(
            keys::IDENTITY_BE_IDENTICAL_TO,
            vec!["[ 1, 2, 3 ]".to_string(), "[ 1, 2, 3 ]".to_string()],
        );

        assert_eq!(
            translator.translate(&message),
            "expected [ 1, 2, 3 ] to be identical to [ 1, 2, 3 ]"
        );
    }

    #[test]
    fn test_translate_chinese() {
        let translator = Translator::new(Language::Zh);
        let message = Message::new(
            keys::EQUALITY_BE_EQUAL_TO,
            vec!["1".to_string(), "2".to_string()],
        );

        assert_eq!(translator.translate(&message), "期望 1 等于 2");
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        let translator = Translator::new(Language::En);
        let message = Message::plain_key("definitely_not_a_key");

        assert_eq!(translator.translate(&message), "definitely_not_a_key");
    }

    #[test]
    fn test_catalogs_cover_same_keys() {
        // 两个目录必须覆盖同一组 key，否则中文输出会混入英文
        for key in EN.keys() {
            assert!(ZH.contains_key(key), "missing zh translation for {}", key);
        }
        for key in ZH.keys() {
            assert!(EN.contains_key(key), "missing en translation for {}", key);
        }
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!("ZH".parse::<Language>(), Ok(Language::Zh));
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_substitute_repeated_placeholder() {
        assert_eq!(
            substitute("{0} and {0} and {1}", &["a".to_string(), "b".to_string()]),
            "a and a and b"
        );
    }

    #[test]
    fn test_substitute_arg_text_is_not_rescanned() {
        // 参数本身长得像占位符时必须原样输出
        assert_eq!(
            substitute(
                "expected {0} to be equal to {1}",
                &["\"{1}\"".to_string(), "\"x\"".to_string()],
            ),
            "expected \"{1}\" to be equal to \"x\""
        );
    }

    #[test]
    fn test_substitute_leaves_non_placeholder_braces_alone() {
        assert_eq!(
            substitute("{0} at {line} {", &["panicked".to_string()]),
            "panicked at {line} {"
        );
        assert_eq!(substitute("{0} and {1}", &["a".to_string()]), "a and {1}");
    }
}
