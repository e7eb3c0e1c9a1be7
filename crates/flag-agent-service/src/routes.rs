//! 路由配置

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use flag_shared::observability::middleware as obs_middleware;
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::state::AppState;

/// 评估端点路径
pub const EVALUATE_PATH: &str = "/evaluate";

/// 构建完整的应用路由
///
/// 未匹配的路径由 axum 返回 404。
pub fn app_router(state: AppState, health_path: &str, request_timeout: Duration) -> Router {
    Router::new()
        .route(&normalize_path(health_path), get(handlers::health))
        .route(EVALUATE_PATH, post(handlers::evaluate))
        .layer(TimeoutLayer::new(request_timeout))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// 保证路径以 `/` 开头
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
