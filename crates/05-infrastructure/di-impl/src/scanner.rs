//! 组件扫描器实现

use di_abstractions::{registered_component_definitions, ComponentDefinition, ComponentScanner, RootScope};
use infrastructure_common::ComponentError;
use std::any::TypeId;
use std::collections::HashSet;
use tracing::{debug, warn};

/// 组件扫描器实现
///
/// 发现顺序：显式注册的组件按注册顺序在前，`#[component]` 宏注册的组件按完整类型路径排序在后。
/// 同一类型同时出现时以显式注册为准。
pub struct ComponentScannerImpl {
    explicit: Vec<ComponentDefinition>,
    include_global: bool,
}

impl ComponentScannerImpl {
    /// 创建扫描器
    pub fn new(explicit: Vec<ComponentDefinition>) -> Self {
        Self {
            explicit,
            include_global: true,
        }
    }

    /// 是否包含宏注册的组件
    pub fn include_global(mut self, include: bool) -> Self {
        self.include_global = include;
        self
    }

    fn global_definitions(&self) -> Vec<ComponentDefinition> {
        if !self.include_global {
            return Vec::new();
        }
        let mut definitions = registered_component_definitions();
        definitions.sort_by(|a, b| a.type_info().full_name().cmp(b.type_info().full_name()));
        definitions.dedup_by(|a, b| a.type_id() == b.type_id());
        definitions
    }
}

impl ComponentScanner for ComponentScannerImpl {
    fn scan(&self, root_scope: &RootScope) -> Result<Vec<ComponentDefinition>, ComponentError> {
        let mut seen: HashSet<TypeId> = HashSet::new();
        let mut discovered = Vec::new();

        for definition in &self.explicit {
            if !root_scope.contains(definition.type_info()) {
                warn!(
                    "显式注册的组件不在根作用域 {} 内，已忽略: {}",
                    root_scope,
                    definition.type_info()
                );
                continue;
            }
            if !seen.insert(definition.type_id()) {
                return Err(ComponentError::registration_error(
                    definition.type_info().to_string(),
                    "组件重复注册",
                ));
            }
            discovered.push(definition.clone());
        }

        for definition in self.global_definitions() {
            if !root_scope.contains(definition.type_info()) {
                continue;
            }
            if !seen.insert(definition.type_id()) {
                debug!("宏注册的组件被显式注册覆盖: {}", definition.type_info());
                continue;
            }
            discovered.push(definition);
        }

        if discovered.is_empty() {
            warn!("根作用域 {} 内没有发现任何组件", root_scope);
        } else {
            debug!("根作用域 {} 内发现 {} 个组件", root_scope, discovered.len());
        }

        Ok(discovered)
    }

    fn name(&self) -> &str {
        "ComponentScannerImpl"
    }
}
