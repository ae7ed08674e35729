//! 组件注册表实现

use di_abstractions::{ComponentDefinition, ComponentLookup};
use infrastructure_common::ComponentError;
use std::any::TypeId;
use std::collections::HashMap;

/// 组件注册表实现
///
/// 发现阶段结束后只读，保留发现顺序。
#[derive(Debug, Default)]
pub struct ComponentRegistryImpl {
    components: Vec<ComponentDefinition>,
    index: HashMap<TypeId, usize>,
}

impl ComponentRegistryImpl {
    /// 从发现结果构建注册表
    pub fn from_definitions(definitions: Vec<ComponentDefinition>) -> Result<Self, ComponentError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (position, definition) in definitions.iter().enumerate() {
            if index.insert(definition.type_id(), position).is_some() {
                return Err(ComponentError::registration_error(
                    definition.type_info().to_string(),
                    "组件重复注册",
                ));
            }
        }

        Ok(Self {
            components: definitions,
            index,
        })
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ComponentLookup for ComponentRegistryImpl {
    fn find(&self, type_id: TypeId) -> Option<&ComponentDefinition> {
        self.index
            .get(&type_id)
            .and_then(|position| self.components.get(*position))
    }

    fn implementations_of(&self, interface: TypeId) -> Vec<&ComponentDefinition> {
        self.components
            .iter()
            .filter(|definition| definition.is_assignable_to(interface))
            .collect()
    }

    fn components(&self) -> &[ComponentDefinition] {
        &self.components
    }
}
