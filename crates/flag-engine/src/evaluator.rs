//! 标志评估器
//!
//! 按文档顺序遍历标志的定向规则，首个命中的规则生效（短路求值）。
//! 评估过程中的任何错误都在此边界被吸收，降级为调用方提供的默认值。

use crate::condition::Condition;
use crate::error::Result;
use crate::models::{ConfigDocument, EvaluationContext, EvaluationResult, TargetingRule};
use serde_json::Value;
use tracing::{debug, warn};

/// 标志评估器
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagEvaluator;

impl FlagEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 评估标志
    ///
    /// 永不失败：内部错误会被记录并转换为 `ERROR` 原因码，取值为 `default_value`。
    pub fn evaluate(
        &self,
        document: &ConfigDocument,
        flag_key: &str,
        context: &EvaluationContext,
        default_value: Value,
    ) -> EvaluationResult {
        match self.try_evaluate(document, flag_key, context, &default_value) {
            Ok(result) => {
                debug!(flag_key, reason = %result.reason, "Flag evaluated");
                result
            }
            Err(e) => {
                warn!(flag_key, error = %e, "Flag evaluation failed, falling back to default");
                EvaluationResult::error(default_value)
            }
        }
    }

    /// 可失败的评估过程，错误原样返回
    pub fn try_evaluate(
        &self,
        document: &ConfigDocument,
        flag_key: &str,
        context: &EvaluationContext,
        default_value: &Value,
    ) -> Result<EvaluationResult> {
        let Some(flag) = document.flag(flag_key)? else {
            return Ok(EvaluationResult::flag_not_found(default_value.clone()));
        };

        for (index, raw) in flag.rules.iter().enumerate() {
            let rule = TargetingRule::decode(flag_key, raw)?;
            let condition = Condition::parse(rule.condition.as_deref());

            if condition.matches(context)? {
                debug!(flag_key, rule_index = index, condition = %condition, "Targeting rule matched");
                return Ok(EvaluationResult::targeting_match(rule.value));
            }
        }

        let flag_default = flag.default.unwrap_or_else(|| default_value.clone());
        Ok(EvaluationResult::default_value(flag_default))
    }
}
