//! 组件生命周期处理器
//!
//! 实例创建后、加入缓存前执行前置处理器；加入缓存后执行后置处理器。

use infrastructure_common::{BeanHandle, BoxError};

/// 前置处理器
///
/// 在实例写入单例缓存之前按注册顺序调用。返回错误会中止该实例的创建，
/// 实例不会进入缓存。
pub trait BeforeAdditionHandler: Send + Sync {
    /// 处理刚创建的实例
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError>;

    /// 处理器名称
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// 后置处理器
///
/// 在实例写入单例缓存之后按注册顺序调用。
pub trait AfterAdditionHandler: Send + Sync {
    /// 处理已缓存的实例
    fn handle(&self, bean: &BeanHandle) -> Result<(), BoxError>;

    /// 处理器名称
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
