//! 请求和响应的数据传输对象

use flag_engine::{EvaluationContext, FlagRequest};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AgentError;

/// 标志评估请求
///
/// 四个选择器字段必填，缺失、null 或空字符串都视为缺少参数。
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub flag_key: Option<String>,
    pub application: Option<String>,
    pub environment: Option<String>,
    pub configuration_profile: Option<String>,
    /// 评估上下文，缺省或 null 时为空对象
    #[serde(default)]
    pub context: Option<Value>,
    /// 调用方默认值，缺省为 null
    #[serde(default)]
    pub default_value: Value,
}

impl EvaluateRequest {
    /// 校验必填参数并转换为引擎请求
    pub fn into_flag_request(self) -> Result<FlagRequest, AgentError> {
        let mut missing = Vec::new();

        let flag_key = required(self.flag_key, "flagKey", &mut missing);
        let application = required(self.application, "application", &mut missing);
        let environment = required(self.environment, "environment", &mut missing);
        let profile = required(
            self.configuration_profile,
            "configurationProfile",
            &mut missing,
        );

        if !missing.is_empty() {
            return Err(AgentError::MissingParameter(missing));
        }

        let context = self
            .context
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(FlagRequest {
            flag_key,
            application,
            environment,
            profile,
            context: EvaluationContext::new(context),
            default_value: self.default_value,
        })
    }
}

fn required(value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
