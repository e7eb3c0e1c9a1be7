//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 健康检查路径
    pub health_path: String,
    /// 单个请求的处理超时（秒）
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 2772,
            health_path: "/health".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// 配置文档存储
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 文档根目录，文档位于 `{base_dir}/{application}/{environment}/{profile}/config.json`
    pub base_dir: PathBuf,
    /// 单次文档加载超时（毫秒）
    pub load_timeout_ms: u64,
}

impl StorageConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("/opt/appconfig-agent/configs"),
            load_timeout_ms: 2000,
        }
    }
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
    pub metrics_enabled: bool,
    pub metrics_port: u16,
}

impl ObservabilityConfig {
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_port: 9090,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（AGENT_ 前缀，双下划线分层，如 AGENT_SERVER__PORT -> server.port）
    /// 5. 兼容旧版代理的扁平变量：AGENT_HOST、AGENT_PORT、AGENT_PATH
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("AGENT_ENV").unwrap_or_else(|_| "development".to_string());

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("AGENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// 应用旧版代理使用的环境变量
    ///
    /// - AGENT_HOST -> server.host
    /// - AGENT_PORT -> server.port（无法解析时忽略）
    /// - AGENT_PATH -> storage.base_dir = {AGENT_PATH}/configs
    fn apply_legacy_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("AGENT_HOST").filter(|v| !v.is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("AGENT_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        if let Some(agent_path) = lookup("AGENT_PATH").filter(|v| !v.is_empty()) {
            self.storage.base_dir = Path::new(&agent_path).join("configs");
        }
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
