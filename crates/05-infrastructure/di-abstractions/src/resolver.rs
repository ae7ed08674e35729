//! 类型解析抽象
//!
//! 接口到实现的选择，以及递归创建时使用的解析上下文

use crate::registry::{ComponentDefinition, ComponentLookup};
use infrastructure_common::{DependencyError, Qualifier, TypeInfo};
use serde::{Deserialize, Serialize};
use std::any::TypeId;

/// 类型解析器 trait
///
/// 在 `implementations_of(interface)` 的候选中选出一个具体组件
pub trait TypeResolver: Send + Sync {
    /// 解析接口的实现
    fn resolve<'a>(
        &self,
        lookup: &'a dyn ComponentLookup,
        interface: &TypeInfo,
        qualifier: &Qualifier,
    ) -> Result<&'a ComponentDefinition, DependencyError>;
}

/// 限定符未命中时的处理策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifierPolicy {
    /// 回退到发现顺序中的第一个实现
    #[default]
    Fallback,
    /// 直接报错
    Strict,
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// 解析上下文
///
/// 保存当前创建链，只在一次顶层解析调用内有效。
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    /// 当前创建链，用于检测循环依赖
    pub resolution_chain: Vec<TypeInfo>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定选项创建解析上下文
    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 类型是否正在创建中
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.resolution_chain.iter().any(|info| info.id == type_id)
    }

    /// 添加类型到创建链
    pub fn push_type(&mut self, type_info: &TypeInfo) -> Result<(), DependencyError> {
        if self.contains(type_info.id) {
            return Err(self.circular_dependency(type_info));
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                type_name: type_info.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        self.resolution_chain.push(type_info.clone());
        Ok(())
    }

    /// 从创建链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 创建链是否为空
    pub fn is_empty(&self) -> bool {
        self.resolution_chain.is_empty()
    }

    /// 生成循环依赖错误，链尾是重新进入的类型
    pub fn circular_dependency(&self, reentered: &TypeInfo) -> DependencyError {
        let mut stack: Vec<String> = self
            .resolution_chain
            .iter()
            .map(ToString::to_string)
            .collect();
        stack.push(reentered.to_string());
        DependencyError::CircularDependency { stack }
    }
}
