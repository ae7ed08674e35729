//! 组件注册表抽象
//!
//! [`ComponentDefinition`] 是一条注册记录：类型标识、限定符、构造函数及其依赖描述、
//! post-construct 钩子，以及该组件可以赋值给哪些接口。

use crate::factory::{adapt_concrete, wrap_argument, AdaptFn, CastFn, ConstructorFn, PostConstructFn, ResolvedArgs};
use infrastructure_common::{BeanInstance, BoxError, Qualifier, TypeInfo};
use std::any::TypeId;
use std::marker::PhantomData;
use std::sync::Arc;

/// 组件查找接口
///
/// 发现阶段结束后注册表只读，解析器通过它枚举候选实现。
pub trait ComponentLookup: Send + Sync {
    /// 按类型查找组件定义
    fn find(&self, type_id: TypeId) -> Option<&ComponentDefinition>;

    /// 按发现顺序列出可以赋值给指定接口的组件
    fn implementations_of(&self, interface: TypeId) -> Vec<&ComponentDefinition>;

    /// 按发现顺序列出全部组件
    fn components(&self) -> &[ComponentDefinition];
}

/// 依赖类型
#[derive(Clone)]
pub enum DependencyKind {
    /// 具体类型，直接创建
    Concrete(AdaptFn),
    /// 接口，需要先经过类型解析器选出实现
    Interface,
}

/// 构造函数参数的依赖描述
#[derive(Clone)]
pub struct Dependency {
    type_info: TypeInfo,
    kind: DependencyKind,
    qualifier: Qualifier,
}

impl Dependency {
    /// 具体类型依赖
    pub fn concrete<T>() -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<T>(),
            kind: DependencyKind::Concrete(adapt_concrete::<T>),
            qualifier: Qualifier::any(),
        }
    }

    /// 接口依赖，`I` 通常是 `dyn Trait`
    pub fn interface<I>() -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            type_info: TypeInfo::of::<I>(),
            kind: DependencyKind::Interface,
            qualifier: Qualifier::any(),
        }
    }

    /// 设置限定符，只对接口依赖生效
    pub fn qualified(mut self, qualifier: impl Into<Qualifier>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// 声明的依赖类型
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 依赖类型
    pub fn kind(&self) -> &DependencyKind {
        &self.kind
    }

    /// 限定符
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// 是否为接口依赖
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, DependencyKind::Interface)
    }
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("type_info", &self.type_info)
            .field("interface", &self.is_interface())
            .field("qualifier", &self.qualifier)
            .finish()
    }
}

/// 构造函数描述
#[derive(Clone)]
pub struct ConstructorDescriptor {
    name: String,
    injection: bool,
    dependencies: Vec<Dependency>,
    factory: ConstructorFn,
}

impl ConstructorDescriptor {
    /// 构造函数名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 是否为指定的注入构造函数
    pub fn is_injection_point(&self) -> bool {
        self.injection
    }

    /// 按声明顺序排列的依赖
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// 调用构造函数
    pub fn invoke(&self, args: &ResolvedArgs) -> Result<BeanInstance, BoxError> {
        (self.factory)(args)
    }
}

impl std::fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("name", &self.name)
            .field("injection", &self.injection)
            .field("dependencies", &self.dependencies)
            .field("factory", &"<function>")
            .finish()
    }
}

/// post-construct 钩子
#[derive(Clone)]
pub struct PostConstructHook {
    name: String,
    hook: PostConstructFn,
}

impl PostConstructHook {
    /// 钩子名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 在实例上执行钩子
    pub fn invoke(&self, instance: &BeanInstance) -> Result<(), BoxError> {
        (self.hook)(instance)
    }
}

impl std::fmt::Debug for PostConstructHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostConstructHook")
            .field("name", &self.name)
            .finish()
    }
}

/// 组件到接口的绑定
#[derive(Clone)]
pub struct InterfaceBinding {
    interface: TypeInfo,
    cast: CastFn,
}

impl InterfaceBinding {
    /// 接口类型
    pub fn interface(&self) -> &TypeInfo {
        &self.interface
    }

    /// 把组件实例转换成接口参数
    pub fn cast(&self, instance: &BeanInstance) -> Option<BeanInstance> {
        (self.cast)(instance)
    }
}

impl std::fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("interface", &self.interface)
            .finish()
    }
}

/// 组件定义
///
/// 发现后不可变。
#[derive(Debug, Clone)]
pub struct ComponentDefinition {
    type_info: TypeInfo,
    qualifier: Qualifier,
    constructors: Vec<ConstructorDescriptor>,
    post_construct: Vec<PostConstructHook>,
    bindings: Vec<InterfaceBinding>,
}

impl ComponentDefinition {
    /// 创建组件定义构建器
    pub fn builder<T>() -> ComponentDefinitionBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        ComponentDefinitionBuilder::new()
    }

    /// 组件类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 组件类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_info.id
    }

    /// 组件限定符
    pub fn qualifier(&self) -> &Qualifier {
        &self.qualifier
    }

    /// 按声明顺序排列的构造函数
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    /// 按声明顺序排列的 post-construct 钩子
    pub fn post_construct_hooks(&self) -> &[PostConstructHook] {
        &self.post_construct
    }

    /// 接口绑定
    pub fn bindings(&self) -> &[InterfaceBinding] {
        &self.bindings
    }

    /// 选择构造函数：第一个注入构造函数，否则第一个声明的构造函数
    pub fn select_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructors
            .iter()
            .find(|constructor| constructor.injection)
            .or_else(|| self.constructors.first())
    }

    /// 查找指定接口的绑定
    pub fn binding_for(&self, interface: TypeId) -> Option<&InterfaceBinding> {
        self.bindings
            .iter()
            .find(|binding| binding.interface.id == interface)
    }

    /// 是否可以赋值给指定接口
    pub fn is_assignable_to(&self, interface: TypeId) -> bool {
        self.binding_for(interface).is_some()
    }
}

/// 组件定义构建器
pub struct ComponentDefinitionBuilder<T> {
    qualifier: Qualifier,
    constructors: Vec<ConstructorDescriptor>,
    post_construct: Vec<PostConstructHook>,
    bindings: Vec<InterfaceBinding>,
    _component: PhantomData<fn() -> T>,
}

impl<T> ComponentDefinitionBuilder<T>
where
    T: Send + Sync + 'static,
{
    fn new() -> Self {
        Self {
            qualifier: Qualifier::any(),
            constructors: Vec::new(),
            post_construct: Vec::new(),
            bindings: Vec::new(),
            _component: PhantomData,
        }
    }

    /// 设置组件限定符
    pub fn qualifier(mut self, qualifier: impl Into<Qualifier>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// 声明组件实现了接口 `I`
    ///
    /// `cast` 通常就是一次 unsized 转换：`|bean| bean as Arc<dyn Trait>`。
    pub fn provides<I, F>(mut self, cast: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        let cast: CastFn = Arc::new(move |instance: &BeanInstance| {
            instance
                .clone()
                .downcast::<T>()
                .ok()
                .map(|typed| wrap_argument(cast(typed)))
        });
        self.bindings.push(InterfaceBinding {
            interface: TypeInfo::of::<I>(),
            cast,
        });
        self
    }

    /// 添加普通构造函数
    pub fn constructor<F>(self, name: impl Into<String>, dependencies: Vec<Dependency>, factory: F) -> Self
    where
        F: Fn(&ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.push_constructor(name.into(), false, dependencies, factory)
    }

    /// 添加注入构造函数，优先于普通构造函数
    pub fn injection_constructor<F>(
        self,
        name: impl Into<String>,
        dependencies: Vec<Dependency>,
        factory: F,
    ) -> Self
    where
        F: Fn(&ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        self.push_constructor(name.into(), true, dependencies, factory)
    }

    /// 添加 post-construct 钩子
    pub fn post_construct<F>(mut self, name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let hook: PostConstructFn = Arc::new(move |instance: &BeanInstance| -> Result<(), BoxError> {
            match instance.downcast_ref::<T>() {
                Some(typed) => hook(typed),
                None => Err(format!("实例不是 {}", std::any::type_name::<T>()).into()),
            }
        });
        self.post_construct.push(PostConstructHook {
            name: name.into(),
            hook,
        });
        self
    }

    /// 构建组件定义
    pub fn build(self) -> ComponentDefinition {
        ComponentDefinition {
            type_info: TypeInfo::of::<T>(),
            qualifier: self.qualifier,
            constructors: self.constructors,
            post_construct: self.post_construct,
            bindings: self.bindings,
        }
    }

    fn push_constructor<F>(
        mut self,
        name: String,
        injection: bool,
        dependencies: Vec<Dependency>,
        factory: F,
    ) -> Self
    where
        F: Fn(&ResolvedArgs) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let factory: ConstructorFn = Arc::new(move |args: &ResolvedArgs| -> Result<BeanInstance, BoxError> {
            let instance: BeanInstance = Arc::new(factory(args)?);
            Ok(instance)
        });
        self.constructors.push(ConstructorDescriptor {
            name,
            injection,
            dependencies,
            factory,
        });
        self
    }
}
