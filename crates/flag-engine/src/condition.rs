//! 定向条件
//!
//! 条件字符串先解析为带标签的语法树，再对上下文求值：
//! - 缺省或空白条件 => `Unconditional`，始终命中
//! - `<dotted.path> == "<literal>"`（或单引号）=> `Equality`
//! - 其他任何形式 => `Unrecognized`，始终不命中
//!
//! 新的谓词类型以新变体的方式加入。

use crate::error::Result;
use crate::models::EvaluationContext;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// 相等谓词：路径段不含空白、点号、`=`、`!` 和引号，字面量不含同类引号
static EQUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*([^\s.=!"']+(?:\.[^\s.=!"']+)*)\s*==\s*(?:"([^"]*)"|'([^']*)')\s*$"#,
    )
    .expect("equality pattern is valid")
});

/// 单引号字面量内部的双引号子串
static DOUBLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("double-quote pattern is valid"));

/// 点号分隔的上下文路径，如 `user.role`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// 条件语法树
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Unconditional,
    Equality { path: FieldPath, literal: String },
    Unrecognized(String),
}

impl Condition {
    /// 解析条件表达式
    pub fn parse(expr: Option<&str>) -> Self {
        let expr = match expr {
            None => return Self::Unconditional,
            Some(expr) if expr.trim().is_empty() => return Self::Unconditional,
            Some(expr) => expr,
        };

        let Some(caps) = EQUALITY.captures(expr) else {
            return Self::Unrecognized(expr.to_string());
        };

        // 双引号优先：单引号字面量中若含有双引号子串，取第一个
        let literal = match (caps.get(2), caps.get(3)) {
            (Some(double), _) => double.as_str().to_string(),
            (None, Some(single)) => DOUBLE_QUOTED
                .captures(single.as_str())
                .map_or(single.as_str(), |inner| inner.get(1).map_or("", |m| m.as_str()))
                .to_string(),
            (None, None) => String::new(),
        };

        Self::Equality {
            path: FieldPath::new(&caps[1]),
            literal,
        }
    }

    /// 对上下文求值
    ///
    /// 路径缺失时返回 `Ok(false)`；只有路径穿过非对象值时才返回错误。
    pub fn matches(&self, context: &EvaluationContext) -> Result<bool> {
        match self {
            Self::Unconditional => Ok(true),
            Self::Equality { path, literal } => {
                let actual = context.lookup(path.segments())?;
                Ok(matches!(actual, Some(Value::String(s)) if s == literal))
            }
            Self::Unrecognized(raw) => {
                debug!(condition = %raw, "Unrecognized condition, treating as no match");
                Ok(false)
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconditional => f.write_str("<always>"),
            Self::Equality { path, literal } => write!(f, "{} == {:?}", path, literal),
            Self::Unrecognized(raw) => write!(f, "<unrecognized: {}>", raw),
        }
    }
}

/// 条件匹配器
pub struct ConditionMatcher;

impl ConditionMatcher {
    /// 判断条件是否命中上下文
    pub fn matches(condition: Option<&str>, context: &EvaluationContext) -> Result<bool> {
        Condition::parse(condition).matches(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use serde_json::json;

    fn admin_context() -> EvaluationContext {
        EvaluationContext::new(json!({"user": {"role": "admin"}}))
    }

    #[test]
    fn test_parse_equality() {
        assert_eq!(
            Condition::parse(Some(r#"user.role == "admin""#)),
            Condition::Equality {
                path: FieldPath::new("user.role"),
                literal: "admin".to_string(),
            }
        );

        assert_eq!(
            Condition::parse(Some("  account.plan=='pro'  ")),
            Condition::Equality {
                path: FieldPath::new("account.plan"),
                literal: "pro".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_empty_literal() {
        assert_eq!(
            Condition::parse(Some(r#"user.role == """#)),
            Condition::Equality {
                path: FieldPath::new("user.role"),
                literal: String::new(),
            }
        );
    }

    #[test]
    fn test_double_quotes_preferred_inside_single_quotes() {
        assert_eq!(
            Condition::parse(Some(r#"user.role == 'say "hi"'"#)),
            Condition::Equality {
                path: FieldPath::new("user.role"),
                literal: "hi".to_string(),
            }
        );

        let ctx = EvaluationContext::new(json!({"user": {"role": "hi"}}));
        assert!(ConditionMatcher::matches(Some(r#"user.role == 'say "hi"'"#), &ctx).unwrap());

        assert_eq!(
            Condition::parse(Some(r#"user.name == "it's""#)),
            Condition::Equality {
                path: FieldPath::new("user.name"),
                literal: "it's".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_unconditional() {
        assert_eq!(Condition::parse(None), Condition::Unconditional);
        assert_eq!(Condition::parse(Some("")), Condition::Unconditional);
        assert_eq!(Condition::parse(Some("   ")), Condition::Unconditional);
    }

    #[test]
    fn test_parse_unrecognized() {
        let cases = [
            r#"user.role != "admin""#,
            r#"user.role == admin"#,
            r#"user.role == "admin" && user.id == "1""#,
            r#"user..role == "admin""#,
            r#"== "admin""#,
            r#"user.age > 18"#,
            r#"user.role == "admin"#,
        ];

        for case in cases {
            assert!(
                matches!(Condition::parse(Some(case)), Condition::Unrecognized(_)),
                "'{}' should not parse",
                case
            );
        }
    }

    #[test]
    fn test_absent_condition_always_matches() {
        assert!(ConditionMatcher::matches(None, &EvaluationContext::empty()).unwrap());
        assert!(ConditionMatcher::matches(None, &admin_context()).unwrap());
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        let cond = Some(r#"user.role == "admin""#);

        assert!(ConditionMatcher::matches(cond, &admin_context()).unwrap());

        let ctx = EvaluationContext::new(json!({"user": {"role": "Admin"}}));
        assert!(!ConditionMatcher::matches(cond, &ctx).unwrap());
    }

    #[test]
    fn test_single_quoted_literal() {
        assert!(ConditionMatcher::matches(Some("user.role == 'admin'"), &admin_context()).unwrap());
    }

    #[test]
    fn test_missing_path_does_not_match() {
        let cond = Some(r#"user.role == "admin""#);

        assert!(!ConditionMatcher::matches(cond, &EvaluationContext::empty()).unwrap());

        let ctx = EvaluationContext::new(json!({"user": {}}));
        assert!(!ConditionMatcher::matches(cond, &ctx).unwrap());
    }

    #[test]
    fn test_non_string_value_does_not_match() {
        let ctx = EvaluationContext::new(json!({"user": {"level": 5, "vip": true}}));

        assert!(!ConditionMatcher::matches(Some(r#"user.level == "5""#), &ctx).unwrap());
        assert!(!ConditionMatcher::matches(Some(r#"user.vip == "true""#), &ctx).unwrap());
    }

    #[test]
    fn test_arbitrary_depth_path() {
        let ctx = EvaluationContext::new(json!({
            "request": {"client": {"platform": {"os": "ios"}}}
        }));

        assert!(
            ConditionMatcher::matches(Some(r#"request.client.platform.os == "ios""#), &ctx)
                .unwrap()
        );
    }

    #[test]
    fn test_unrecognized_never_matches() {
        let ctx = EvaluationContext::new(json!({"user": {"role": "admin", "age": 30}}));

        assert!(!ConditionMatcher::matches(Some("user.age > 18"), &ctx).unwrap());
        assert!(!ConditionMatcher::matches(Some("true"), &ctx).unwrap());
    }

    #[test]
    fn test_path_through_scalar_is_error() {
        let ctx = EvaluationContext::new(json!({"user": ["admin"]}));

        let result = ConditionMatcher::matches(Some(r#"user.role == "admin""#), &ctx);
        assert!(matches!(result, Err(EvalError::TypeMismatch { .. })));
    }

    #[test]
    fn test_display() {
        let cond = Condition::parse(Some("user.role=='admin'"));
        assert_eq!(cond.to_string(), r#"user.role == "admin""#);
    }
}
