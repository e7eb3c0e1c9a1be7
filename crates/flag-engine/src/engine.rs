//! 标志引擎
//!
//! 单次请求的线性组合：定位并加载配置文档，再评估标志。

use crate::error::ResolveError;
use crate::evaluator::FlagEvaluator;
use crate::models::{EvaluationContext, EvaluationResult};
use crate::resolver::ConfigResolver;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

/// 单次评估请求
#[derive(Debug, Clone)]
pub struct FlagRequest {
    pub flag_key: String,
    pub application: String,
    pub environment: String,
    pub profile: String,
    pub context: EvaluationContext,
    pub default_value: Value,
}

/// 标志引擎
#[derive(Clone)]
pub struct FlagEngine {
    resolver: Arc<dyn ConfigResolver>,
    evaluator: FlagEvaluator,
}

impl FlagEngine {
    pub fn new(resolver: Arc<dyn ConfigResolver>) -> Self {
        Self {
            resolver,
            evaluator: FlagEvaluator::new(),
        }
    }

    /// 评估一次请求
    ///
    /// 只有配置解析失败会返回错误；评估阶段的问题已被降级为 `ERROR` 原因码。
    #[instrument(
        skip(self, request),
        fields(
            flag_key = %request.flag_key,
            application = %request.application,
            environment = %request.environment,
            profile = %request.profile,
        )
    )]
    pub fn evaluate(&self, request: FlagRequest) -> Result<EvaluationResult, ResolveError> {
        let document = self.resolver.resolve(
            &request.application,
            &request.environment,
            &request.profile,
        )?;

        Ok(self.evaluator.evaluate(
            &document,
            &request.flag_key,
            &request.context,
            request.default_value,
        ))
    }
}
