//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 组件与接口的类型标识
//! - [`Qualifier`] - 多实现消歧用的限定符标签
//! - [`BeanInstance`] / [`BeanHandle`] - 已构造的单例实例
//! - [`DependencyError`] / [`ComponentError`] / [`ConfigError`] - 错误分类
//!
//! ## 设计原则
//!
//! - 用显式注册表替代运行时反射
//! - 类型擦除只发生在容器边界，取出时重新获得强类型

pub mod component;
pub mod errors;
pub mod metadata;

pub use component::*;
pub use errors::*;
pub use metadata::*;
