use std::fmt;

use crate::assertion::types::AssertValue;

/// 把断言值渲染为消息里的展示文本
///
/// 渲染是确定性的：对象键按字典序输出，同一个值在任何一次
/// 运行里都渲染出相同的文本
pub fn render_value(value: &AssertValue) -> String {
    match value {
        AssertValue::Absent => "absent".to_string(),
        AssertValue::Null => "null".to_string(),
        AssertValue::Bool(b) => b.to_string(),
        AssertValue::Number(n) => render_number(*n),
        AssertValue::String(s) => format!("\"{}\"", s),
        AssertValue::List(items) => {
            if items.is_empty() {
                "[]".to_string()
            } else {
                let rendered: Vec<String> = items.iter().map(render_value).collect();
                format!("[ {} ]", rendered.join(", "))
            }
        }
        AssertValue::Object(entries) => {
            if entries.is_empty() {
                "{}".to_string()
            } else {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, render_value(value)))
                    .collect();
                format!("{{ {} }}", rendered.join(", "))
            }
        }
    }
}

/// 整数值不带小数点输出
fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for AssertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_value(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_primitives() {
        assert_eq!(render_value(&AssertValue::Absent), "absent");
        assert_eq!(render_value(&AssertValue::Null), "null");
        assert_eq!(render_value(&AssertValue::from(true)), "true");
        assert_eq!(render_value(&AssertValue::from("hi")), "\"hi\"");
    }

    #[test]
    fn test_render_numbers() {
        assert_eq!(render_value(&AssertValue::from(42)), "42");
        assert_eq!(render_value(&AssertValue::from(-3)), "-3");
        assert_eq!(render_value(&AssertValue::from(1.5)), "1.5");
        assert_eq!(render_value(&AssertValue::from(2.0)), "2");
    }

    #[test]
    fn test_render_list() {
        assert_eq!(render_value(&AssertValue::list(Vec::<i32>::new())), "[]");
        assert_eq!(render_value(&AssertValue::list([1, 2, 3])), "[ 1, 2, 3 ]");
        assert_eq!(
            render_value(&AssertValue::list(["a", "b"])),
            "[ \"a\", \"b\" ]"
        );
    }

    #[test]
    fn test_render_object_sorted_keys() {
        let value = AssertValue::object([
            ("b", AssertValue::from(2)),
            ("a", AssertValue::from(1)),
        ]);
        // 键按字典序，与插入顺序无关
        assert_eq!(render_value(&value), "{ a: 1, b: 2 }");
    }

    #[test]
    fn test_render_nested() {
        let value = AssertValue::object([(
            "items",
            AssertValue::list([AssertValue::object([("id", 1)])]),
        )]);
        assert_eq!(render_value(&value), "{ items: [ { id: 1 } ] }");
    }
}
