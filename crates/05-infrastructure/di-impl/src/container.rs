//! 依赖注入容器实现

use crate::builder::BeanGraphBuilder;
use crate::cache::SingletonCache;
use crate::pipeline::LifecyclePipeline;
use crate::registry::ComponentRegistryImpl;
use crate::resolver::QualifierTypeResolver;
use crate::scanner::ComponentScannerImpl;
use di_abstractions::{
    AfterAdditionHandler, BeforeAdditionHandler, ComponentDefinition, ComponentDefinitionProvider,
    ComponentLookup, ComponentScanner, ContainerConfig, ContainerState, ContainerStats, DiContainer,
    QualifierPolicy, ResolveContext, RootScope,
};
use infrastructure_common::{ComponentError, DependencyError, TypeInfo};
use once_cell::sync::OnceCell;
use std::any::TypeId;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// 初始化结果
#[derive(Debug, Clone)]
enum InitOutcome {
    Ready,
    Failed(String),
}

/// 具体的依赖注入容器实现
pub struct DiContainerImpl {
    config: ContainerConfig,
    scanner: Box<dyn ComponentScanner>,
    resolver: QualifierTypeResolver,
    pipeline: LifecyclePipeline,
    cache: Arc<SingletonCache>,
    registry: OnceCell<ComponentRegistryImpl>,
    outcome: OnceCell<InitOutcome>,
}

impl DiContainerImpl {
    /// 创建容器构建器
    pub fn builder(root_scope: impl Into<String>) -> DiContainerBuilder {
        DiContainerBuilder::new(root_scope)
    }

    /// 添加前置处理器，需要在初始化之前调用
    pub fn add_before_handler(&mut self, handler: Arc<dyn BeforeAdditionHandler>) {
        if self.outcome.get().is_some() {
            warn!("容器已初始化，前置处理器 {} 不会生效", handler.name());
        }
        self.pipeline.add_before_handler(handler);
    }

    /// 添加后置处理器，需要在初始化之前调用
    pub fn add_after_handler(&mut self, handler: Arc<dyn AfterAdditionHandler>) {
        if self.outcome.get().is_some() {
            warn!("容器已初始化，后置处理器 {} 不会生效", handler.name());
        }
        self.pipeline.add_after_handler(handler);
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// 单例缓存
    pub fn singletons(&self) -> Arc<SingletonCache> {
        self.cache.clone()
    }

    /// 容器状态
    pub fn state(&self) -> ContainerState {
        match self.outcome.get() {
            None => ContainerState::Uninitialized,
            Some(InitOutcome::Ready) => ContainerState::Ready,
            Some(InitOutcome::Failed(_)) => ContainerState::Failed,
        }
    }

    fn run_initialization(&self) -> Result<(), DependencyError> {
        let started = Instant::now();
        let root_scope = RootScope::parse(&self.config.root_scope)?;
        info!("开始初始化容器，根作用域: {}, 扫描器: {}", root_scope, self.scanner.name());

        let definitions = self.scanner.scan(&root_scope)?;
        let registry = ComponentRegistryImpl::from_definitions(definitions)?;
        let registry = self.registry.get_or_init(|| registry);
        info!("发现 {} 个组件", registry.len());

        let builder = BeanGraphBuilder::new(registry, &self.resolver, &self.cache, &self.pipeline);
        for definition in registry.components() {
            let mut context = ResolveContext::with_options(self.config.resolve_options());
            builder.create_bean(definition.type_info(), &mut context)?;
        }

        info!(
            "容器初始化完成，{} 个单例，耗时 {} 毫秒",
            self.cache.len(),
            started.elapsed().as_millis()
        );
        Ok(())
    }
}

impl DiContainer for DiContainerImpl {
    fn initialize(&self) -> Result<(), DependencyError> {
        let mut first_error = None;
        let outcome = self.outcome.get_or_init(|| match self.run_initialization() {
            Ok(()) => InitOutcome::Ready,
            Err(cause) => {
                error!("容器初始化失败: {}", cause);
                let message = cause.to_string();
                first_error = Some(cause);
                InitOutcome::Failed(message)
            }
        });

        if let Some(cause) = first_error {
            return Err(cause);
        }
        match outcome {
            InitOutcome::Ready => Ok(()),
            InitOutcome::Failed(message) => Err(DependencyError::InitializationFailed {
                message: message.clone(),
            }),
        }
    }

    fn get_bean<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: Send + Sync + 'static,
    {
        if self.outcome.get().is_none() {
            self.initialize()?;
        }

        let bean = self.cache.get_typed::<T>();
        if bean.is_none() {
            debug!("单例缓存中没有 {}", std::any::type_name::<T>());
        }
        bean.ok_or_else(|| DependencyError::not_found(std::any::type_name::<T>()))
    }

    fn is_initialized(&self) -> bool {
        matches!(self.outcome.get(), Some(InitOutcome::Ready))
    }

    fn registered_components(&self) -> Vec<TypeInfo> {
        self.registry
            .get()
            .map(|registry| {
                registry
                    .components()
                    .iter()
                    .map(|definition| definition.type_info().clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn stats(&self) -> ContainerStats {
        ContainerStats {
            registered_components: self.registry.get().map_or(0, ComponentRegistryImpl::len),
            active_singletons: self.cache.len(),
            before_handlers: self.pipeline.before_count(),
            after_handlers: self.pipeline.after_count(),
            state: self.state(),
        }
    }
}

impl std::fmt::Debug for DiContainerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiContainerImpl")
            .field("config", &self.config)
            .field("scanner", &self.scanner.name())
            .field("pipeline", &self.pipeline)
            .field("state", &self.state())
            .finish()
    }
}

/// 容器构建器
pub struct DiContainerBuilder {
    root_scope: String,
    config: ContainerConfig,
    definitions: Vec<ComponentDefinition>,
    scanner: Option<Box<dyn ComponentScanner>>,
    pipeline: LifecyclePipeline,
}

impl DiContainerBuilder {
    /// 创建构建器
    pub fn new(root_scope: impl Into<String>) -> Self {
        Self {
            root_scope: root_scope.into(),
            config: ContainerConfig::default(),
            definitions: Vec::new(),
            scanner: None,
            pipeline: LifecyclePipeline::new(),
        }
    }

    /// 使用配置，构建器的根作用域非空时优先
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// 显式注册组件
    pub fn register(mut self, definition: ComponentDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// 按提供者注册组件
    pub fn register_component<T>(self) -> Self
    where
        T: ComponentDefinitionProvider,
    {
        self.register(T::component_definition())
    }

    /// 使用自定义扫描器，显式注册的组件将由它负责
    pub fn with_scanner(mut self, scanner: Box<dyn ComponentScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// 是否包含 `#[component]` 宏注册的组件
    pub fn include_global_components(mut self, include: bool) -> Self {
        self.config.include_global_components = include;
        self
    }

    /// 设置限定符策略
    pub fn qualifier_policy(mut self, policy: QualifierPolicy) -> Self {
        self.config.qualifier_policy = policy;
        self
    }

    /// 设置最大解析深度
    pub fn max_resolution_depth(mut self, depth: usize) -> Self {
        self.config.max_resolution_depth = depth;
        self
    }

    /// 添加前置处理器
    pub fn add_before_handler(mut self, handler: Arc<dyn BeforeAdditionHandler>) -> Self {
        self.pipeline.add_before_handler(handler);
        self
    }

    /// 添加后置处理器
    pub fn add_after_handler(mut self, handler: Arc<dyn AfterAdditionHandler>) -> Self {
        self.pipeline.add_after_handler(handler);
        self
    }

    /// 构建容器
    ///
    /// 只检查配置和重复注册，组件发现在 [`DiContainer::initialize`] 中进行。
    pub fn build(self) -> Result<DiContainerImpl, DependencyError> {
        let mut config = self.config;
        if !self.root_scope.trim().is_empty() {
            config.root_scope = self.root_scope;
        }
        config.validate()?;

        let mut seen: Vec<TypeId> = Vec::with_capacity(self.definitions.len());
        for definition in &self.definitions {
            if seen.contains(&definition.type_id()) {
                return Err(ComponentError::registration_error(
                    definition.type_info().to_string(),
                    "组件重复注册",
                )
                .into());
            }
            seen.push(definition.type_id());
        }

        let scanner = match self.scanner {
            Some(scanner) => {
                if !self.definitions.is_empty() {
                    warn!(
                        "使用自定义扫描器 {}，忽略 {} 个显式注册的组件",
                        scanner.name(),
                        self.definitions.len()
                    );
                }
                scanner
            }
            None => Box::new(
                ComponentScannerImpl::new(self.definitions)
                    .include_global(config.include_global_components),
            ),
        };

        debug!("构建容器，根作用域: {}", config.root_scope);
        Ok(DiContainerImpl {
            resolver: QualifierTypeResolver::new(config.qualifier_policy),
            config,
            scanner,
            pipeline: self.pipeline,
            cache: Arc::new(SingletonCache::new()),
            registry: OnceCell::new(),
            outcome: OnceCell::new(),
        })
    }
}
