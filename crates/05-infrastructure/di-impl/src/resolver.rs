//! 基于限定符的类型解析器

use di_abstractions::{ComponentDefinition, ComponentLookup, QualifierPolicy, TypeResolver};
use infrastructure_common::{DependencyError, Qualifier, TypeInfo};
use tracing::{debug, warn};

/// 限定符类型解析器
///
/// 未指定限定符时返回发现顺序中的第一个实现；指定限定符时返回第一个标签相同的实现，
/// 没有命中时按 [`QualifierPolicy`] 回退或报错。
#[derive(Debug, Clone, Copy, Default)]
pub struct QualifierTypeResolver {
    policy: QualifierPolicy,
}

impl QualifierTypeResolver {
    /// 创建解析器
    pub fn new(policy: QualifierPolicy) -> Self {
        Self { policy }
    }

    /// 当前策略
    pub fn policy(&self) -> QualifierPolicy {
        self.policy
    }
}

impl TypeResolver for QualifierTypeResolver {
    fn resolve<'a>(
        &self,
        lookup: &'a dyn ComponentLookup,
        interface: &TypeInfo,
        qualifier: &Qualifier,
    ) -> Result<&'a ComponentDefinition, DependencyError> {
        let candidates = lookup.implementations_of(interface.id);
        let Some(first) = candidates.first().copied() else {
            return Err(DependencyError::NoImplementationFound {
                interface: interface.to_string(),
            });
        };

        let Some(tag) = qualifier.as_str() else {
            return Ok(first);
        };

        if let Some(matched) = candidates
            .iter()
            .copied()
            .find(|candidate| candidate.qualifier() == qualifier)
        {
            debug!("接口 {} 按限定符 \"{}\" 解析为 {}", interface, tag, matched.type_info());
            return Ok(matched);
        }

        match self.policy {
            QualifierPolicy::Fallback => {
                warn!(
                    "接口 {} 没有限定符为 \"{}\" 的实现，回退到 {}",
                    interface,
                    tag,
                    first.type_info()
                );
                Ok(first)
            }
            QualifierPolicy::Strict => Err(DependencyError::QualifierMismatch {
                interface: interface.to_string(),
                qualifier: tag.to_string(),
            }),
        }
    }
}
