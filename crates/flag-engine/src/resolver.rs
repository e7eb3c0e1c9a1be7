//! 配置文档定位与加载
//!
//! 由 (application, environment, profile) 三元组加上构造时注入的基础位置，
//! 确定性地推导出存储键。只读，不缓存，不重试。

use crate::error::ResolveError;
use crate::models::ConfigDocument;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

/// 每个配置目录下的文档文件名
pub const DOCUMENT_FILE_NAME: &str = "config.json";

/// 配置解析器接口
#[cfg_attr(test, mockall::automock)]
pub trait ConfigResolver: Send + Sync {
    fn resolve(
        &self,
        application: &str,
        environment: &str,
        profile: &str,
    ) -> Result<ConfigDocument, ResolveError>;
}

/// 校验选择器并返回相对存储路径 `application/environment/profile/config.json`
///
/// 每一段都必须是单个非空路径组件，不能逃逸出基础目录。
pub fn relative_document_path(
    application: &str,
    environment: &str,
    profile: &str,
) -> Result<PathBuf, ResolveError> {
    validate_segment("application", application)?;
    validate_segment("environment", environment)?;
    validate_segment("configurationProfile", profile)?;

    Ok([application, environment, profile, DOCUMENT_FILE_NAME]
        .iter()
        .collect())
}

fn validate_segment(field: &'static str, value: &str) -> Result<(), ResolveError> {
    if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\', '\0']) {
        return Err(ResolveError::InvalidSelector {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// 基于文件系统的解析器
#[derive(Debug, Clone)]
pub struct FileConfigResolver {
    base_dir: PathBuf,
}

impl FileConfigResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// 文档的完整路径
    pub fn document_path(
        &self,
        application: &str,
        environment: &str,
        profile: &str,
    ) -> Result<PathBuf, ResolveError> {
        let relative = relative_document_path(application, environment, profile)?;
        Ok(self.base_dir.join(relative))
    }
}

impl ConfigResolver for FileConfigResolver {
    #[instrument(skip(self), fields(base_dir = %self.base_dir.display()))]
    fn resolve(
        &self,
        application: &str,
        environment: &str,
        profile: &str,
    ) -> Result<ConfigDocument, ResolveError> {
        let path = self.document_path(application, environment, profile)?;

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ResolveError::NotFound { path });
            }
            Err(source) => return Err(ResolveError::Io { path, source }),
        };

        let document = ConfigDocument::from_slice(&bytes)
            .map_err(|source| ResolveError::ParseError { path: path.clone(), source })?;

        debug!(path = %path.display(), size = bytes.len(), "Configuration loaded");
        Ok(document)
    }
}

type SelectorKey = (String, String, String);

/// 内存解析器
///
/// 使用 DashMap 保存原始文档文本，适合测试注入和嵌入式使用。
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigResolver {
    documents: Arc<DashMap<SelectorKey, String>>,
}

impl MemoryConfigResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入（或替换）一份原始文档
    pub fn insert(
        &self,
        application: impl Into<String>,
        environment: impl Into<String>,
        profile: impl Into<String>,
        document: impl Into<String>,
    ) {
        self.documents.insert(
            (application.into(), environment.into(), profile.into()),
            document.into(),
        );
    }
}

impl ConfigResolver for MemoryConfigResolver {
    fn resolve(
        &self,
        application: &str,
        environment: &str,
        profile: &str,
    ) -> Result<ConfigDocument, ResolveError> {
        let path = relative_document_path(application, environment, profile)?;
        let key = (
            application.to_string(),
            environment.to_string(),
            profile.to_string(),
        );

        let Some(raw) = self.documents.get(&key) else {
            return Err(ResolveError::NotFound { path });
        };

        ConfigDocument::from_slice(raw.as_bytes())
            .map_err(|source| ResolveError::ParseError { path, source })
    }
}
