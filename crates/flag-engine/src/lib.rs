//! 特性标志解析引擎
//!
//! 提供标志评估的核心能力：
//! - 按 (application, environment, profile) 定位并加载 JSON 配置文档
//! - 按文档顺序遍历定向规则，首个命中者生效
//! - 条件语法解析与上下文匹配
//! - 评估失败降级为调用方默认值，并给出原因码

pub mod condition;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod resolver;

pub use condition::{Condition, ConditionMatcher, FieldPath};
pub use engine::{FlagEngine, FlagRequest};
pub use error::{EvalError, ResolveError, Result};
pub use evaluator::FlagEvaluator;
pub use models::{
    ConfigDocument, EvaluationContext, EvaluationResult, FlagDefinition, ReasonCode,
    TargetingRule,
};
pub use resolver::{
    ConfigResolver, DOCUMENT_FILE_NAME, FileConfigResolver, MemoryConfigResolver,
    relative_document_path,
};
