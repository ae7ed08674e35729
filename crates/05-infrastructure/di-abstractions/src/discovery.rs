//! 组件发现抽象
//!
//! `#[component]` 宏在程序启动时把组件定义提供者提交到全局列表，
//! 扫描器在发现阶段读取这个列表。

use crate::registry::ComponentDefinition;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

/// 组件定义提供者
///
/// 由 `#[component]` 宏生成实现，也可以手写。
pub trait ComponentDefinitionProvider {
    /// 生成组件定义
    fn component_definition() -> ComponentDefinition;
}

/// 组件定义提供函数
pub type ComponentProviderFn = fn() -> ComponentDefinition;

/// 全局组件提供者列表
static GLOBAL_COMPONENTS: Lazy<RwLock<Vec<ComponentProviderFn>>> =
    Lazy::new(|| RwLock::new(Vec::new()));

/// 提交组件定义提供者
///
/// 在 `#[ctor::ctor]` 函数中调用。同一类型的重复定义由扫描器去重。
pub fn submit_component(provider: ComponentProviderFn) {
    GLOBAL_COMPONENTS.write().push(provider);
}

/// 获取已提交的全部提供者，按提交顺序
pub fn registered_component_providers() -> Vec<ComponentProviderFn> {
    GLOBAL_COMPONENTS.read().clone()
}

/// 生成全部已提交的组件定义
pub fn registered_component_definitions() -> Vec<ComponentDefinition> {
    registered_component_providers()
        .into_iter()
        .map(|provider| provider())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    fn marker_definition() -> ComponentDefinition {
        ComponentDefinition::builder::<Marker>()
            .constructor("new", Vec::new(), |_| Ok(Marker))
            .build()
    }

    #[test]
    fn submitted_provider_is_listed() {
        submit_component(marker_definition);

        assert!(registered_component_definitions()
            .iter()
            .any(|definition| definition.type_id() == std::any::TypeId::of::<Marker>()));
    }
}
