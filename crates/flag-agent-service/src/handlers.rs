//! HTTP 请求处理器

use std::time::Instant;

use axum::{Json, body::Bytes, extract::State};
use flag_engine::EvaluationResult;
use flag_shared::observability::metrics;
use tracing::{info, warn};

use crate::dto::{EvaluateRequest, HealthResponse};
use crate::error::{AgentError, Result};
use crate::state::AppState;

/// 健康检查中返回的服务名
pub const SERVICE_NAME: &str = "appconfig-agent";

/// 存活探针
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}

/// 评估标志
///
/// POST /evaluate
///
/// 请求体自行解析，以便非法 JSON 与缺少参数都以统一的错误格式返回。
pub async fn evaluate(State(state): State<AppState>, body: Bytes) -> Result<Json<EvaluationResult>> {
    let request: EvaluateRequest = serde_json::from_slice(&body)?;
    let flag_request = request.into_flag_request()?;
    let flag_key = flag_request.flag_key.clone();

    let start = Instant::now();
    let engine = state.engine.clone();
    let task = tokio::task::spawn_blocking(move || engine.evaluate(flag_request));

    let outcome = match tokio::time::timeout(state.load_timeout, task).await {
        Ok(joined) => joined.map_err(|e| AgentError::Internal(format!("评估任务异常退出: {}", e)))?,
        Err(_) => {
            warn!(flag_key = %flag_key, timeout = ?state.load_timeout, "Configuration load timed out");
            metrics::record_config_resolve_error("CONFIG_LOAD_TIMEOUT");
            return Err(AgentError::LoadTimeout(state.load_timeout));
        }
    };

    match outcome {
        Ok(result) => {
            let elapsed = start.elapsed();
            metrics::record_flag_evaluation(result.reason.as_str(), elapsed.as_secs_f64());
            info!(
                flag_key = %flag_key,
                reason = %result.reason,
                latency_us = elapsed.as_micros() as u64,
                "Flag evaluated"
            );
            Ok(Json(result))
        }
        Err(e) => {
            warn!(flag_key = %flag_key, code = e.code(), error = %e, "Configuration resolution failed");
            metrics::record_config_resolve_error(e.code());
            Err(e.into())
        }
    }
}
