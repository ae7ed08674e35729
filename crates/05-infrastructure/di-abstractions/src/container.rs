//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象

use crate::resolver::{QualifierPolicy, ResolveOptions};
use infrastructure_common::{ConfigError, DependencyError, TypeInfo};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// 依赖注入容器 trait
///
/// 单例作用域：每个组件类型在容器生命周期内只有一个实例。
pub trait DiContainer: Send + Sync {
    /// 初始化容器
    ///
    /// 发现根作用域内的组件并逐个创建，遇到第一个错误立即中止。
    /// 只执行一次，之后的调用直接返回第一次的结果。
    fn initialize(&self) -> Result<(), DependencyError>;

    /// 获取组件实例
    ///
    /// 容器未初始化时先触发初始化。
    fn get_bean<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static;

    /// 是否已成功初始化
    fn is_initialized(&self) -> bool;

    /// 按发现顺序列出已发现的组件
    fn registered_components(&self) -> Vec<TypeInfo>;

    /// 容器统计信息
    fn stats(&self) -> ContainerStats;
}

/// 容器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerState {
    /// 尚未初始化
    Uninitialized,
    /// 初始化成功
    Ready,
    /// 初始化失败，不会重试
    Failed,
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 根作用域，例如 `example_app`
    pub root_scope: String,
    /// 限定符未命中时的处理策略
    pub qualifier_policy: QualifierPolicy,
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 是否包含 `#[component]` 宏注册的组件
    pub include_global_components: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            root_scope: String::new(),
            qualifier_policy: QualifierPolicy::default(),
            max_resolution_depth: 100,
            include_global_components: true,
        }
    }
}

impl ContainerConfig {
    /// 从 TOML 字符串加载
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载，`.json` 按 JSON 解析，其余按 TOML 解析
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        debug!(
            "加载容器配置: {} ({})",
            path.display(),
            if is_json { "json" } else { "toml" }
        );
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 解析选项
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.max_resolution_depth,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStats {
    /// 已发现组件数量
    pub registered_components: usize,
    /// 已缓存的单例数量
    pub active_singletons: usize,
    /// 前置处理器数量
    pub before_handlers: usize,
    /// 后置处理器数量
    pub after_handlers: usize,
    /// 容器状态
    pub state: ContainerState,
}

impl Default for ContainerStats {
    fn default() -> Self {
        Self {
            registered_components: 0,
            active_singletons: 0,
            before_handlers: 0,
            after_handlers: 0,
            state: ContainerState::Uninitialized,
        }
    }
}
