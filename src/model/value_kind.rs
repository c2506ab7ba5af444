//! 类型分类：六种值类型，以及编辑文本与值之间保持类型的往返转换

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// JSON 值类型（与 UI 展示解耦）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Array | ValueKind::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("未知的值类型: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ValueKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "null" => Ok(ValueKind::Null),
            "boolean" => Ok(ValueKind::Boolean),
            "number" => Ok(ValueKind::Number),
            "string" => Ok(ValueKind::String),
            "array" => Ok(ValueKind::Array),
            "object" => Ok(ValueKind::Object),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// 编辑文本无法按原类型解析时的错误
#[derive(Error, Debug)]
pub enum ValueParseError {
    #[error("数字格式无效")]
    InvalidNumberFormat,
    #[error("布尔值无效，请输入 \"true\" 或 \"false\"")]
    InvalidBooleanFormat,
    #[error("空值无效，请输入 \"null\"")]
    InvalidNullFormat,
    #[error("值必须是数组")]
    ExpectedArray,
    #[error("值必须是对象")]
    ExpectedObject,
    #[error("字面量格式错误: {0}")]
    MalformedLiteral(#[from] serde_json::Error),
}

/// 判定值的类型
pub fn classify(v: &Value) -> ValueKind {
    match v {
        Value::Null => ValueKind::Null,
        Value::Array(_) => ValueKind::Array,
        Value::Bool(_) => ValueKind::Boolean,
        Value::Number(_) => ValueKind::Number,
        Value::String(_) => ValueKind::String,
        Value::Object(_) => ValueKind::Object,
    }
}

/// 生成编辑框中的初始文本
///
/// 容器以两空格缩进的 JSON 展示；字符串原样（不加引号）；null 为空串。
pub fn format_for_edit(v: &Value) -> String {
    match v {
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
        }
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// 按原值的类型解释编辑文本，结果类型必定与原值相同
pub fn parse_by_original_type(raw: &str, original: &Value) -> Result<Value, ValueParseError> {
    match original {
        Value::Number(_) => parse_number(raw),
        Value::Bool(_) => match raw {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(ValueParseError::InvalidBooleanFormat),
        },
        Value::Null => match raw {
            "null" => Ok(Value::Null),
            _ => Err(ValueParseError::InvalidNullFormat),
        },
        Value::String(_) => Ok(Value::String(raw.to_string())),
        Value::Array(_) => match serde_json::from_str::<Value>(raw)? {
            parsed @ Value::Array(_) => Ok(parsed),
            _ => Err(ValueParseError::ExpectedArray),
        },
        Value::Object(_) => match serde_json::from_str::<Value>(raw)? {
            parsed @ Value::Object(_) => Ok(parsed),
            _ => Err(ValueParseError::ExpectedObject),
        },
    }
}

fn parse_number(raw: &str) -> Result<Value, ValueParseError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ValueParseError::InvalidNumberFormat);
    }
    // 整数保持整数表示
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::from(i));
    }
    if let Ok(u) = text.parse::<u64>() {
        return Ok(Value::from(u));
    }
    let f: f64 = text
        .parse()
        .map_err(|_| ValueParseError::InvalidNumberFormat)?;
    // inf / NaN 不是合法的 JSON 数字
    serde_json::Number::from_f64(f)
        .map(Value::Number)
        .ok_or(ValueParseError::InvalidNumberFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_all_kinds() {
        assert_eq!(classify(&json!(null)), ValueKind::Null);
        assert_eq!(classify(&json!(true)), ValueKind::Boolean);
        assert_eq!(classify(&json!(1.5)), ValueKind::Number);
        assert_eq!(classify(&json!("s")), ValueKind::String);
        assert_eq!(classify(&json!([])), ValueKind::Array);
        assert_eq!(classify(&json!({})), ValueKind::Object);
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [
            ValueKind::Null,
            ValueKind::Boolean,
            ValueKind::Number,
            ValueKind::String,
            ValueKind::Array,
            ValueKind::Object,
        ] {
            assert_eq!(kind.as_str().parse::<ValueKind>(), Ok(kind));
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
        assert!("date".parse::<ValueKind>().is_err());
    }

    #[test]
    fn test_format_for_edit() {
        assert_eq!(format_for_edit(&json!("hello")), "hello");
        assert_eq!(format_for_edit(&json!(null)), "");
        assert_eq!(format_for_edit(&json!(42)), "42");
        assert_eq!(format_for_edit(&json!(false)), "false");
        assert_eq!(format_for_edit(&json!([1, 2])), "[\n  1,\n  2\n]");
        assert_eq!(format_for_edit(&json!({"a": 1})), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(parse_by_original_type("5", &json!(1)).unwrap(), json!(5));
        assert_eq!(parse_by_original_type(" -3 ", &json!(1)).unwrap(), json!(-3));
        assert_eq!(parse_by_original_type("2.5", &json!(1)).unwrap(), json!(2.5));
        assert_eq!(parse_by_original_type("1e3", &json!(1)).unwrap(), json!(1000.0));

        for bad in ["hello", "", "   ", "NaN", "inf", "1,5"] {
            assert!(
                matches!(
                    parse_by_original_type(bad, &json!(1)),
                    Err(ValueParseError::InvalidNumberFormat)
                ),
                "{:?} 不应被接受为数字",
                bad
            );
        }
    }

    #[test]
    fn test_boolean_and_null_parsing() {
        assert_eq!(parse_by_original_type("true", &json!(false)).unwrap(), json!(true));
        assert_eq!(parse_by_original_type("false", &json!(true)).unwrap(), json!(false));
        assert!(matches!(
            parse_by_original_type("True", &json!(true)),
            Err(ValueParseError::InvalidBooleanFormat)
        ));
        assert_eq!(parse_by_original_type("null", &json!(null)).unwrap(), json!(null));
        assert!(matches!(
            parse_by_original_type("", &json!(null)),
            Err(ValueParseError::InvalidNullFormat)
        ));
    }

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(
            parse_by_original_type("  {\"a\":1} ", &json!("x")).unwrap(),
            json!("  {\"a\":1} ")
        );
    }

    #[test]
    fn test_container_parsing() {
        assert_eq!(parse_by_original_type("[1, 2]", &json!([])).unwrap(), json!([1, 2]));
        assert!(matches!(
            parse_by_original_type("{\"a\": 1}", &json!([])),
            Err(ValueParseError::ExpectedArray)
        ));
        assert!(matches!(
            parse_by_original_type("[1,", &json!([])),
            Err(ValueParseError::MalformedLiteral(_))
        ));

        assert_eq!(
            parse_by_original_type("{\"b\": [true]}", &json!({})).unwrap(),
            json!({"b": [true]})
        );
        assert!(matches!(
            parse_by_original_type("[]", &json!({"a": 1})),
            Err(ValueParseError::ExpectedObject)
        ));
        assert!(matches!(
            parse_by_original_type("null", &json!({"a": 1})),
            Err(ValueParseError::ExpectedObject)
        ));
        assert!(matches!(
            parse_by_original_type("{oops}", &json!({})),
            Err(ValueParseError::MalformedLiteral(_))
        ));
    }

    #[test]
    fn test_parse_preserves_kind() {
        let originals = [json!(null), json!(true), json!(7), json!("s"), json!([1]), json!({"k": 1})];
        let inputs = ["null", "true", "false", "12", "-0.5", "abc", "", "[]", "[1,2]", "{}", "{\"x\":null}", "\"q\""];
        for original in &originals {
            for input in inputs {
                if let Ok(parsed) = parse_by_original_type(input, original) {
                    assert_eq!(classify(&parsed), classify(original), "输入 {:?} 改变了 {} 的类型", input, original);
                }
            }
        }
    }
}
