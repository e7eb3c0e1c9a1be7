//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;
use std::time::Duration;

use flag_engine::{ConfigResolver, FlagEngine};

/// Axum 应用共享状态
///
/// 引擎本身无状态，这里只持有注入的解析器和超时设置
#[derive(Clone)]
pub struct AppState {
    pub engine: FlagEngine,
    /// 单次配置加载 + 评估的超时
    pub load_timeout: Duration,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(resolver: Arc<dyn ConfigResolver>, load_timeout: Duration) -> Self {
        Self {
            engine: FlagEngine::new(resolver),
            load_timeout,
        }
    }
}
