//! 组件工厂抽象
//!
//! 构造函数、类型转换和 post-construct 钩子在注册表里都以类型擦除的函数保存

use infrastructure_common::{BeanInstance, BoxError, DependencyError};
use std::sync::Arc;

/// 构造函数：接收已解析的参数，返回新实例
pub type ConstructorFn = Arc<dyn Fn(&ResolvedArgs) -> Result<BeanInstance, BoxError> + Send + Sync>;

/// post-construct 钩子：在完全装配的实例上执行
pub type PostConstructFn = Arc<dyn Fn(&BeanInstance) -> Result<(), BoxError> + Send + Sync>;

/// 把缓存中的实例转换成构造参数的形式，类型不符时返回 `None`
pub type CastFn = Arc<dyn Fn(&BeanInstance) -> Option<BeanInstance> + Send + Sync>;

/// 具体类型依赖的转换函数
pub type AdaptFn = fn(&BeanInstance) -> Option<BeanInstance>;

/// 已解析的构造参数
///
/// 每个参数都保存为 `Arc<T>` 的类型擦除形式，`T` 可以是具体类型也可以是 `dyn Trait`。
#[derive(Default)]
pub struct ResolvedArgs {
    arguments: Vec<BeanInstance>,
}

impl ResolvedArgs {
    /// 创建参数列表
    pub fn new(arguments: Vec<BeanInstance>) -> Self {
        Self { arguments }
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// 按位置取出参数
    pub fn get<T>(&self, index: usize) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.arguments
            .get(index)
            .and_then(|argument| argument.downcast_ref::<Arc<T>>())
            .cloned()
            .ok_or_else(|| DependencyError::ArgumentMismatch {
                index,
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}

impl std::fmt::Debug for ResolvedArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedArgs")
            .field("len", &self.arguments.len())
            .finish()
    }
}

/// 包装成构造参数形式
pub fn wrap_argument<T>(value: Arc<T>) -> BeanInstance
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// 具体类型依赖的默认转换
pub fn adapt_concrete<T>(bean: &BeanInstance) -> Option<BeanInstance>
where
    T: Send + Sync + 'static,
{
    bean.clone().downcast::<T>().ok().map(wrap_argument)
}
