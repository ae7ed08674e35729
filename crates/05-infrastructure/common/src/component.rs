//! 组件实例定义
//!
//! 容器内部以类型擦除的 [`BeanInstance`] 保存单例，对外再按类型取回。

use crate::metadata::TypeInfo;
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的组件实例
pub type BeanInstance = Arc<dyn Any + Send + Sync>;

/// 组件实例标识，基于实例地址
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeanIdentity(usize);

impl BeanIdentity {
    /// 获取实例标识
    pub fn of(instance: &BeanInstance) -> Self {
        Self(Arc::as_ptr(instance).cast::<()>() as usize)
    }
}

/// 生命周期处理器看到的组件实例
#[derive(Clone)]
pub struct BeanHandle {
    type_info: TypeInfo,
    instance: BeanInstance,
}

impl BeanHandle {
    /// 创建新的实例句柄
    pub fn new(type_info: TypeInfo, instance: BeanInstance) -> Self {
        Self {
            type_info,
            instance,
        }
    }

    /// 组件类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 类型擦除的实例
    pub fn instance(&self) -> &BeanInstance {
        &self.instance
    }

    /// 实例标识
    pub fn identity(&self) -> BeanIdentity {
        BeanIdentity::of(&self.instance)
    }

    /// 按具体类型借用实例
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for BeanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanHandle")
            .field("type_info", &self.type_info)
            .field("identity", &self.identity())
            .finish()
    }
}
