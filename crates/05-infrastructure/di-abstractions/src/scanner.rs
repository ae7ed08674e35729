//! 组件扫描器抽象接口
//!
//! 提供在根作用域内发现组件的能力

use crate::registry::ComponentDefinition;
use infrastructure_common::{ComponentError, TypeInfo};
use std::fmt;
use tracing::warn;

/// 组件扫描器 trait
///
/// 用于发现根作用域内的全部组件
pub trait ComponentScanner: Send + Sync {
    /// 扫描根作用域，按发现顺序返回组件定义
    fn scan(&self, root_scope: &RootScope) -> Result<Vec<ComponentDefinition>, ComponentError>;

    /// 获取扫描器名称
    fn name(&self) -> &str;
}

/// 根作用域
///
/// 一个 Rust 路径前缀，例如 `example_app` 或 `example_app::repositories`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootScope(String);

impl RootScope {
    /// 解析根作用域
    pub fn parse(scope: &str) -> Result<Self, ComponentError> {
        let scope = scope.trim();
        if scope.is_empty() {
            warn!("拒绝空的根作用域");
            return Err(ComponentError::scan_error(scope, "根作用域为空"));
        }

        for segment in scope.split("::") {
            if !is_identifier(segment) {
                warn!("根作用域 {} 包含无效的路径段: {:?}", scope, segment);
                return Err(ComponentError::scan_error(
                    scope,
                    format!("无效的路径段: \"{segment}\""),
                ));
            }
        }

        Ok(Self(scope.to_string()))
    }

    /// 作用域字符串
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 类型是否位于作用域内
    pub fn contains(&self, type_info: &TypeInfo) -> bool {
        let path = type_info.full_name();
        path == self.0
            || path
                .strip_prefix(self.0.as_str())
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

impl fmt::Display for RootScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
