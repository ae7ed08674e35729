//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentDefinition`] - 组件注册记录
//! - [`ComponentLookup`] - 组件查找接口
//! - [`ComponentScanner`] - 组件扫描器接口
//! - [`TypeResolver`] - 接口实现解析器
//! - [`BeforeAdditionHandler`] / [`AfterAdditionHandler`] - 生命周期处理器
//! - [`DiContainer`] - 容器接口
//!
//! 接口 trait 需要声明 `Send + Sync` 父 trait，并且 `provides::<dyn Trait, _>` 与
//! `Dependency::interface::<dyn Trait>()` 必须写成同一个类型。

pub mod registry;
pub mod scanner;
pub mod resolver;
pub mod factory;
pub mod discovery;
pub mod lifecycle;
pub mod container;

pub use registry::*;
pub use scanner::*;
pub use resolver::*;
pub use factory::*;
pub use discovery::*;
pub use lifecycle::*;
pub use container::*;
