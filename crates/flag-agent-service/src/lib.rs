//! 特性标志代理服务
//!
//! 将标志引擎包装为 HTTP 接口：
//!
//! - `POST /evaluate`：按 (application, environment, configurationProfile) 加载配置并评估标志
//! - `GET /health`：存活探针
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型及 HTTP 映射
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dto::{EvaluateRequest, HealthResponse};
pub use error::{AgentError, Result};
pub use routes::app_router;
pub use state::AppState;
