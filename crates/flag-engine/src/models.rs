//! 标志引擎领域模型

use crate::error::{EvalError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// 配置文档
///
/// 对应单个 (application, environment, profile) 三元组的 JSON 文档。
/// 解析阶段只保证语法合法，各标志的结构在评估时按需解码，
/// 因此单个标志写错只会影响该标志的评估结果。
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    root: Value,
}

impl ConfigDocument {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// 从 JSON 字节解析
    pub fn from_slice(bytes: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let root: Value = serde_json::from_slice(bytes)?;
        Ok(Self { root })
    }

    /// 获取 `features` 映射
    ///
    /// `features` 缺失或为 null 时返回 `None`，等价于空映射。
    pub fn features(&self) -> Result<Option<&Map<String, Value>>> {
        let root = self.root.as_object().ok_or_else(|| {
            EvalError::MalformedDocument(format!(
                "根节点应为对象, 实际为 {}",
                json_type_name(&self.root)
            ))
        })?;

        match root.get("features") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(features)) => Ok(Some(features)),
            Some(other) => Err(EvalError::MalformedDocument(format!(
                "features 应为对象, 实际为 {}",
                json_type_name(other)
            ))),
        }
    }

    /// 查找并解码标志定义
    ///
    /// 标志不存在（或值为 null）时返回 `Ok(None)`。
    pub fn flag(&self, key: &str) -> Result<Option<FlagDefinition>> {
        let raw = match self.features()?.and_then(|features| features.get(key)) {
            None | Some(Value::Null) => return Ok(None),
            Some(raw) => raw,
        };

        FlagDefinition::deserialize(raw)
            .map(Some)
            .map_err(|source| EvalError::MalformedFlag {
                flag: key.to_string(),
                source,
            })
    }
}

/// 标志定义
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlagDefinition {
    /// 标志自身的默认值，显式写出的 null 也视为存在
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    /// 按文档顺序排列的原始规则，遍历到时才逐条解码
    #[serde(default)]
    pub rules: Vec<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// 定向规则
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetingRule {
    /// 条件表达式，缺省表示无条件命中
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl TargetingRule {
    /// 解码单条规则，失败时归属到所在标志
    pub fn decode(flag: &str, raw: &Value) -> Result<Self> {
        Self::deserialize(raw).map_err(|source| EvalError::MalformedFlag {
            flag: flag.to_string(),
            source,
        })
    }
}

/// 评估上下文 - 调用方在请求时提供的属性
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    data: Value,
}

impl EvaluationContext {
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// 空上下文
    pub fn empty() -> Self {
        Self {
            data: Value::Object(Map::new()),
        }
    }

    /// 按路径段逐级查找映射键
    ///
    /// 缺失的键返回 `Ok(None)`；
    /// 中间值存在但不是对象（包括 null）时返回 `TypeMismatch`。
    pub fn lookup<S: AsRef<str>>(&self, segments: &[S]) -> Result<Option<&Value>> {
        let mut current = &self.data;

        for (depth, segment) in segments.iter().enumerate() {
            match current {
                Value::Object(map) => match map.get(segment.as_ref()) {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
                other => {
                    let walked = segments[..depth]
                        .iter()
                        .map(|s| s.as_ref())
                        .collect::<Vec<_>>()
                        .join(".");
                    return Err(EvalError::TypeMismatch {
                        path: if walked.is_empty() {
                            "<context>".to_string()
                        } else {
                            walked
                        },
                        expected: "object",
                        actual: json_type_name(other),
                    });
                }
            }
        }

        Ok(Some(current))
    }
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::empty()
    }
}

/// 原因码：说明取值是如何得出的
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    FlagNotFound,
    TargetingMatch,
    Default,
    Error,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlagNotFound => "FLAG_NOT_FOUND",
            Self::TargetingMatch => "TARGETING_MATCH",
            Self::Default => "DEFAULT",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 评估结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub value: Value,
    pub reason: ReasonCode,
}

impl EvaluationResult {
    pub fn new(value: Value, reason: ReasonCode) -> Self {
        Self { value, reason }
    }

    pub fn flag_not_found(default_value: Value) -> Self {
        Self::new(default_value, ReasonCode::FlagNotFound)
    }

    pub fn targeting_match(value: Value) -> Self {
        Self::new(value, ReasonCode::TargetingMatch)
    }

    pub fn default_value(value: Value) -> Self {
        Self::new(value, ReasonCode::Default)
    }

    pub fn error(default_value: Value) -> Self {
        Self::new(default_value, ReasonCode::Error)
    }
}

/// 获取值的类型名称
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
