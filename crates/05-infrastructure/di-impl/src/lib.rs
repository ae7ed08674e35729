//! # 依赖注入具体实现
//!
//! 提供具体的依赖注入容器、组件扫描器、注册表和解析器实现
//!
//! ## 初始化流程
//!
//! 1. [`ComponentScannerImpl`] 发现根作用域内的组件
//! 2. [`ComponentRegistryImpl`] 按发现顺序保存组件定义
//! 3. [`BeanGraphBuilder`] 逐个创建组件，接口依赖交给 [`QualifierTypeResolver`]
//! 4. [`LifecyclePipeline`] 在实例进入 [`SingletonCache`] 前后调用处理器
//!
//! ```ignore
//! let container = DiContainerImpl::builder("example_app")
//!     .add_before_handler(before.clone())
//!     .add_after_handler(Arc::new(LoggingAfterAdditionHandler::new(before)))
//!     .build()?;
//! let service = container.get_bean::<CommentService>()?;
//! ```

pub mod builder;
pub mod cache;
pub mod container;
pub mod handlers;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod scanner;

pub use builder::BeanGraphBuilder;
pub use cache::SingletonCache;
pub use container::{DiContainerBuilder, DiContainerImpl};
pub use handlers::{BeanTiming, LoggingAfterAdditionHandler, LoggingBeforeAdditionHandler};
pub use pipeline::LifecyclePipeline;
pub use registry::ComponentRegistryImpl;
pub use resolver::QualifierTypeResolver;
pub use scanner::ComponentScannerImpl;
