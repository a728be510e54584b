use crate::assertion::render::render_value;
use crate::assertion::types::{
    AssertError, AssertKind, AssertValue, CodeOutcome, CompareOp, ExceptionMatcher, InclusionMode,
    Subject,
};
use crate::i18n::{Message, keys};

/// 断言求值结论
#[derive(Debug, Clone)]
pub enum Verdict {
    Pass,
    /// 不成立，携带待翻译的失败消息
    Fail(Message),
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// 执行断言求值
///
/// 断言引擎唯一的分发入口：七种算子在这里穷尽处理。
/// 返回 `Err` 表示断言本身无法求值（类型不匹配等），调用方应把
/// 它记录为 error 而不是 failure
pub fn evaluate_assertion(kind: &AssertKind, subject: &Subject) -> Result<Verdict, AssertError> {
    match (kind, subject) {
        (AssertKind::Equality { expected, negated }, Subject::Value(actual)) => {
            Ok(eval_equality(actual, expected, *negated))
        }
        (AssertKind::Identity { expected, negated }, Subject::Value(actual)) => {
            Ok(eval_identity(actual, expected, *negated))
        }
        (AssertKind::Match { pattern }, Subject::Value(actual)) => {
            let AssertValue::String(text) = actual else {
                return Err(AssertError::TypeMismatch {
                    expected: "string".to_string(),
                    actual: actual.type_name().to_string(),
                });
            };
            if pattern.is_match(text) {
                Ok(Verdict::Pass)
            } else {
                Ok(Verdict::Fail(Message::new(
                    keys::MATCH_TO_MATCH,
                    vec![render_value(actual), format!("/{}/", pattern.as_str())],
                )))
            }
        }
        (AssertKind::Truthiness { expected }, Subject::Value(actual)) => {
            Ok(eval_truthiness(actual, *expected))
        }
        (AssertKind::Inclusion { mode }, Subject::Value(actual)) => eval_inclusion(actual, mode),
        (AssertKind::NumericCompare { op, bound }, Subject::Value(actual)) => {
            eval_numeric(actual, *op, *bound)
        }
        (AssertKind::ExceptionExpectation { matcher, negated }, Subject::Code(outcome)) => {
            Ok(eval_exception(outcome, matcher.as_ref(), *negated))
        }
        (AssertKind::ExceptionExpectation { .. }, Subject::Value(_)) => {
            Err(AssertError::InvalidSubject(
                "exception expectations need a code block, not a value".to_string(),
            ))
        }
        (_, Subject::Code(_)) => Err(AssertError::InvalidSubject(
            "value assertions cannot run against a code block".to_string(),
        )),
    }
}

fn eval_equality(actual: &AssertValue, expected: &AssertValue, negated: bool) -> Verdict {
    let equal = actual.deep_equals(expected);
    if equal != negated {
        return Verdict::Pass;
    }
    let key = if negated {
        keys::EQUALITY_BE_NOT_EQUAL_TO
    } else {
        keys::EQUALITY_BE_EQUAL_TO
    };
    Verdict::Fail(Message::new(
        key,
        vec![render_value(actual), render_value(expected)],
    ))
}

fn eval_identity(actual: &AssertValue, expected: &AssertValue, negated: bool) -> Verdict {
    let Some(identical) = actual.identical_to(expected) else {
        // 双向（同一/不同一）都不可判定
        return Verdict::Fail(Message::plain_key(keys::IDENTITY_UNDETERMINED));
    };
    if identical != negated {
        return Verdict::Pass;
    }
    let key = if negated {
        keys::IDENTITY_BE_NOT_IDENTICAL_TO
    } else {
        keys::IDENTITY_BE_IDENTICAL_TO
    };
    Verdict::Fail(Message::new(
        key,
        vec![render_value(actual), render_value(expected)],
    ))
}

/// 严格判定：只有布尔值才可能通过，其他类型一律不成立
fn eval_truthiness(actual: &AssertValue, expected: bool) -> Verdict {
    if matches!(actual, AssertValue::Bool(b) if *b == expected) {
        return Verdict::Pass;
    }
    let key = if expected {
        keys::TRUTHINESS_BE_TRUE
    } else {
        keys::TRUTHINESS_BE_FALSE
    };
    Verdict::Fail(Message::new(key, vec![render_value(actual)]))
}

fn eval_inclusion(actual: &AssertValue, mode: &InclusionMode) -> Result<Verdict, AssertError> {
    match mode {
        InclusionMode::Includes(needle) => {
            if contains(actual, needle)? {
                Ok(Verdict::Pass)
            } else {
                Ok(Verdict::Fail(Message::new(
                    keys::INCLUSION_INCLUDE,
                    vec![render_value(actual), render_value(needle)],
                )))
            }
        }
        InclusionMode::DoesNotInclude(needle) => {
            if contains(actual, needle)? {
                Ok(Verdict::Fail(Message::new(
                    keys::INCLUSION_NOT_INCLUDE,
                    vec![render_value(actual), render_value(needle)],
                )))
            } else {
                Ok(Verdict::Pass)
            }
        }
        InclusionMode::IncludesExactly(expected) => {
            let AssertValue::List(items) = actual else {
                return Err(AssertError::TypeMismatch {
                    expected: "list".to_string(),
                    actual: actual.type_name().to_string(),
                });
            };
            if multiset_equal(items, expected) {
                Ok(Verdict::Pass)
            } else {
                let wanted = AssertValue::list(expected.clone());
                Ok(Verdict::Fail(Message::new(
                    keys::INCLUSION_INCLUDE_EXACTLY,
                    vec![render_value(actual), render_value(&wanted)],
                )))
            }
        }
        InclusionMode::Empty => {
            if emptiness(actual)? {
                Ok(Verdict::Pass)
            } else {
                Ok(Verdict::Fail(Message::new(
                    keys::INCLUSION_BE_EMPTY,
                    vec![render_value(actual)],
                )))
            }
        }
        InclusionMode::NotEmpty => {
            if emptiness(actual)? {
                Ok(Verdict::Fail(Message::new(
                    keys::INCLUSION_BE_NOT_EMPTY,
                    vec![render_value(actual)],
                )))
            } else {
                Ok(Verdict::Pass)
            }
        }
    }
}

/// 列表按深相等找元素；字符串找子串
fn contains(actual: &AssertValue, needle: &AssertValue) -> Result<bool, AssertError> {
    match actual {
        AssertValue::List(items) => Ok(items.iter().any(|item| item.deep_equals(needle))),
        AssertValue::String(text) => {
            let AssertValue::String(substring) = needle else {
                return Err(AssertError::TypeMismatch {
                    expected: "string".to_string(),
                    actual: needle.type_name().to_string(),
                });
            };
            Ok(text.contains(substring.as_str()))
        }
        other => Err(AssertError::TypeMismatch {
            expected: "list or string".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}

fn emptiness(actual: &AssertValue) -> Result<bool, AssertError> {
    match actual {
        AssertValue::List(items) => Ok(items.is_empty()),
        AssertValue::String(text) => Ok(text.is_empty()),
        AssertValue::Object(entries) => Ok(entries.is_empty()),
        other => Err(AssertError::TypeMismatch {
            expected: "list, string or object".to_string(),
            actual: other.type_name().to_string(),
        }),
    }
}

/// 不计顺序的元素一一对应，重复元素按个数计
fn multiset_equal(items: &[AssertValue], expected: &[AssertValue]) -> bool {
    if items.len() != expected.len() {
        return false;
    }
    let mut remaining: Vec<&AssertValue> = items.iter().collect();
    for want in expected {
        match remaining.iter().position(|have| have.deep_equals(want)) {
            Some(index) => {
                remaining.remove(index);
            }
            None => return false,
        }
    }
    remaining.is_empty()
}

fn eval_numeric(actual: &AssertValue, op: CompareOp, bound: f64) -> Result<Verdict, AssertError> {
    let AssertValue::Number(value) = actual else {
        return Err(AssertError::TypeMismatch {
            expected: "number".to_string(),
            actual: actual.type_name().to_string(),
        });
    };

    let passed = match op {
        CompareOp::Greater => *value > bound,
        CompareOp::GreaterOrEqual => *value >= bound,
        CompareOp::Less => *value < bound,
        CompareOp::LessOrEqual => *value <= bound,
        CompareOp::NearTo(precision) => {
            (*value - bound).abs() < 10f64.powi(-(precision as i32))
        }
    };
    if passed {
        return Ok(Verdict::Pass);
    }

    let bound_value = AssertValue::Number(bound);
    let message = match op {
        CompareOp::Greater => Message::new(
            keys::NUMERIC_BE_GREATER_THAN,
            vec![render_value(actual), render_value(&bound_value)],
        ),
        CompareOp::GreaterOrEqual => Message::new(
            keys::NUMERIC_BE_GREATER_OR_EQUAL,
            vec![render_value(actual), render_value(&bound_value)],
        ),
        CompareOp::Less => Message::new(
            keys::NUMERIC_BE_LESS_THAN,
            vec![render_value(actual), render_value(&bound_value)],
        ),
        CompareOp::LessOrEqual => Message::new(
            keys::NUMERIC_BE_LESS_OR_EQUAL,
            vec![render_value(actual), render_value(&bound_value)],
        ),
        CompareOp::NearTo(precision) => Message::new(
            keys::NUMERIC_BE_NEAR_TO,
            vec![
                render_value(actual),
                render_value(&bound_value),
                precision.to_string(),
            ],
        ),
    };
    Ok(Verdict::Fail(message))
}

fn eval_exception(
    outcome: &CodeOutcome,
    matcher: Option<&ExceptionMatcher>,
    negated: bool,
) -> Verdict {
    match (outcome, negated) {
        (CodeOutcome::Completed, true) => Verdict::Pass,
        (CodeOutcome::Raised(raised), true) => Verdict::Fail(Message::new(
            keys::EXCEPTION_NOT_RAISE,
            vec![format!("\"{}\"", raised)],
        )),
        (CodeOutcome::Completed, false) => {
            let wanted = matcher
                .map(ExceptionMatcher::describe)
                .unwrap_or_else(|| "an exception".to_string());
            Verdict::Fail(Message::new(keys::EXCEPTION_NOTHING_RAISED, vec![wanted]))
        }
        (CodeOutcome::Raised(raised), false) => match matcher {
            None => Verdict::Pass,
            Some(matcher) if matcher.matches(raised) => Verdict::Pass,
            Some(matcher) => Verdict::Fail(Message::new(
                keys::EXCEPTION_RAISE,
                vec![matcher.describe(), format!("\"{}\"", raised)],
            )),
        },
    }
}
