//! 组件依赖图构建器
//!
//! 递归解析构造函数依赖并创建实例。创建链通过 [`ResolveContext`] 在递归调用之间传递，
//! 不保存在容器上。

use crate::cache::SingletonCache;
use crate::pipeline::LifecyclePipeline;
use di_abstractions::{
    ComponentDefinition, ComponentLookup, Dependency, DependencyKind, ResolveContext, ResolvedArgs,
    TypeResolver,
};
use infrastructure_common::{BeanHandle, BeanInstance, DependencyError, TypeInfo};
use tracing::debug;

/// 组件依赖图构建器
pub struct BeanGraphBuilder<'a> {
    lookup: &'a dyn ComponentLookup,
    resolver: &'a dyn TypeResolver,
    cache: &'a SingletonCache,
    pipeline: &'a LifecyclePipeline,
}

impl<'a> BeanGraphBuilder<'a> {
    /// 创建构建器
    pub fn new(
        lookup: &'a dyn ComponentLookup,
        resolver: &'a dyn TypeResolver,
        cache: &'a SingletonCache,
        pipeline: &'a LifecyclePipeline,
    ) -> Self {
        Self {
            lookup,
            resolver,
            cache,
            pipeline,
        }
    }

    /// 创建组件实例
    ///
    /// 先检查循环依赖再检查缓存，已缓存的实例直接返回。
    /// 依赖的创建错误原样向上传递。
    pub fn create_bean(
        &self,
        type_info: &TypeInfo,
        context: &mut ResolveContext,
    ) -> Result<BeanInstance, DependencyError> {
        if context.contains(type_info.id) {
            return Err(context.circular_dependency(type_info));
        }

        if let Some(instance) = self.cache.get(type_info.id) {
            return Ok(instance);
        }

        let definition = self
            .lookup
            .find(type_info.id)
            .ok_or_else(|| DependencyError::not_found(type_info.to_string()))?;

        context.push_type(type_info)?;
        let result = self.construct(definition, context);
        context.pop_type();
        result
    }

    fn construct(
        &self,
        definition: &ComponentDefinition,
        context: &mut ResolveContext,
    ) -> Result<BeanInstance, DependencyError> {
        let type_info = definition.type_info();
        let constructor = definition.select_constructor().ok_or_else(|| {
            DependencyError::creation_failed(type_info.to_string(), "没有可用的构造函数")
        })?;
        debug!(
            "创建组件 {}，使用构造函数 {} (深度 {})",
            type_info,
            constructor.name(),
            context.depth()
        );

        let mut arguments = Vec::with_capacity(constructor.dependencies().len());
        for (index, dependency) in constructor.dependencies().iter().enumerate() {
            arguments.push(self.resolve_dependency(definition, index, dependency, context)?);
        }

        let instance = constructor
            .invoke(&ResolvedArgs::new(arguments))
            .map_err(|source| DependencyError::creation_failed(type_info.to_string(), source))?;
        let bean = BeanHandle::new(type_info.clone(), instance.clone());

        self.pipeline.before_addition(&bean)?;

        if !self.cache.insert_once(type_info, instance.clone()) {
            return Err(DependencyError::creation_failed(
                type_info.to_string(),
                "单例缓存中已存在该类型的实例",
            ));
        }

        let hooked = self
            .pipeline
            .after_addition(&bean)
            .and_then(|()| self.pipeline.post_construct(definition, &bean));
        if let Err(error) = hooked {
            self.cache.evict(type_info.id);
            return Err(error);
        }

        debug!("组件创建完成: {}", type_info);
        Ok(instance)
    }

    fn resolve_dependency(
        &self,
        dependent: &ComponentDefinition,
        index: usize,
        dependency: &Dependency,
        context: &mut ResolveContext,
    ) -> Result<BeanInstance, DependencyError> {
        let declared = dependency.type_info();
        let mismatch = || {
            DependencyError::creation_failed(
                dependent.type_info().to_string(),
                DependencyError::ArgumentMismatch {
                    index,
                    expected: declared.to_string(),
                },
            )
        };

        match dependency.kind() {
            DependencyKind::Concrete(adapt) => {
                if self.lookup.find(declared.id).is_none() {
                    return Err(DependencyError::creation_failed(
                        dependent.type_info().to_string(),
                        DependencyError::not_found(declared.to_string()),
                    ));
                }
                let bean = self.create_bean(declared, context)?;
                adapt(&bean).ok_or_else(mismatch)
            }
            DependencyKind::Interface => {
                let implementation =
                    self.resolver
                        .resolve(self.lookup, declared, dependency.qualifier())?;
                debug!(
                    "{} 的第 {} 个参数 {} 解析为 {}",
                    dependent.type_info().short_name(),
                    index,
                    declared,
                    implementation.type_info()
                );
                let bean = self.create_bean(implementation.type_info(), context)?;
                implementation
                    .binding_for(declared.id)
                    .and_then(|binding| binding.cast(&bean))
                    .ok_or_else(mismatch)
            }
        }
    }
}
