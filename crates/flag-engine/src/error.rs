//! 标志引擎错误类型
//!
//! 解析错误（`ResolveError`）对单次请求是终结性的，需要向调用方区分上报；
//! 评估错误（`EvalError`）永远不会越过 `FlagEvaluator::evaluate` 的边界，
//! 只会被降级为 `ERROR` 原因码。

use std::path::PathBuf;
use thiserror::Error;

/// 配置文档定位/加载错误
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("无效的配置选择器: {field}={value:?}")]
    InvalidSelector { field: &'static str, value: String },

    #[error("配置不存在: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("配置解析失败: {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置读取失败: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSelector { .. } => "INVALID_SELECTOR",
            Self::NotFound { .. } => "CONFIG_NOT_FOUND",
            Self::ParseError { .. } => "CONFIG_PARSE_ERROR",
            Self::Io { .. } => "CONFIG_IO_ERROR",
        }
    }
}

/// 标志评估错误（仅在引擎内部流转）
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("配置文档结构无效: {0}")]
    MalformedDocument(String),

    #[error("标志定义无效: {flag}: {source}")]
    MalformedFlag {
        flag: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("类型不匹配: 路径 '{path}' 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, EvalError>;
