//! 标志代理服务错误类型定义
//!
//! 解析失败（NotFound / ParseError）保持为不同的错误码与状态码，
//! 评估失败不会出现在这里：引擎已将其降级为 `ERROR` 原因码。

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use flag_engine::ResolveError;
use serde_json::json;

/// 标志代理服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("请求体不是合法的 JSON: {0}")]
    InvalidJson(String),

    #[error("缺少必填参数: {}", .0.join(", "))]
    MissingParameter(Vec<&'static str>),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("配置加载超时: {0:?}")]
    LoadTimeout(Duration),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl AgentError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::Resolve(e) => match e {
                ResolveError::InvalidSelector { .. } => StatusCode::BAD_REQUEST,
                ResolveError::NotFound { .. } => StatusCode::NOT_FOUND,
                ResolveError::ParseError { .. } | ResolveError::Io { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::LoadTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::Resolve(ResolveError::Io { .. }) => "INTERNAL_ERROR",
            Self::Resolve(e) => e.code(),
            Self::LoadTimeout(_) => "CONFIG_LOAD_TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Resolve(e @ ResolveError::Io { .. }) => {
                tracing::error!(error = %e, "配置读取失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "error": message,
            "code": self.error_code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 JSON 反序列化错误转换
impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidJson(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
