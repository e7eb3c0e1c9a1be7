//! 特性标志代理服务
//!
//! 提供 HTTP 接口的标志评估服务。

use std::sync::Arc;
use std::time::Duration;

use flag_agent_service::{AppState, app_router};
use flag_engine::FileConfigResolver;
use flag_shared::{config::AppConfig, observability};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 文件可选，仅用于本地开发
    let _ = dotenvy::dotenv();

    // 统一加载配置：从 config/{service_name}.toml 加载，包含可观测性配置
    let config = AppConfig::load("flag-agent").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig {
            service_name: "flag-agent".to_string(),
            ..AppConfig::default()
        }
    });

    let guard = observability::init(&config.service_name, &config.observability).await?;

    info!(
        base_dir = %config.storage.base_dir.display(),
        environment = %config.environment,
        metrics_enabled = guard.metrics_enabled(),
        "Starting flag agent on {}",
        config.server_addr()
    );

    let resolver = Arc::new(FileConfigResolver::new(config.storage.base_dir.clone()));
    let state = AppState::new(resolver, config.storage.load_timeout());

    let app = app_router(
        state,
        &config.server.health_path,
        Duration::from_secs(config.server.request_timeout_seconds),
    );

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    // 优雅关闭：收到 SIGTERM 或 Ctrl+C 时，
    // 停止接收新连接并等待已有请求处理完毕
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// 监听关闭信号
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
