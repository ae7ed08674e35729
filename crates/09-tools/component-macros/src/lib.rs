//! # Component Macros
//!
//! 这个 crate 提供了用于自动组件注册的过程宏。
//!
//! ## 核心宏
//!
//! - [`component`] - 组件注册宏，用于组件类型的固有 `impl` 块
//!
//! ## 辅助标记
//!
//! 以下标记只在 `#[component]` 的 `impl` 块内有效，展开时会被移除：
//!
//! - `#[autowired]` - 指定注入构造函数
//! - `#[qualifier("tag")]` - 构造函数参数的限定符
//! - `#[post_construct]` - 创建完成后调用的 `&self` 方法
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::component;
//! use std::sync::Arc;
//!
//! pub trait CommentRepository: Send + Sync {
//!     fn store_comment(&self, comment: &Comment);
//! }
//!
//! pub struct CommentService {
//!     repository: Arc<dyn CommentRepository>,
//! }
//!
//! #[component]
//! impl CommentService {
//!     #[autowired]
//!     pub fn new(#[qualifier("file")] repository: Arc<dyn CommentRepository>) -> Self {
//!         Self { repository }
//!     }
//!
//!     #[post_construct]
//!     fn init(&self) {}
//! }
//! ```
//!
//! 使用宏的 crate 需要同时依赖 `di-abstractions` 和 `ctor`。

use proc_macro::TokenStream;

mod component;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 组件注册宏
///
/// 为组件生成 `ComponentDefinitionProvider` 实现，并在程序启动时提交到全局组件列表。
///
/// 构造函数是 `impl` 块中没有 `self` 参数、参数都是 `Arc<T>`、返回 `Self` 或
/// `Result<Self, E>` 的函数，按声明顺序登记。参数为 `Arc<dyn Trait>` 时按接口解析。
///
/// # 参数
///
/// - `qualifier = "tag"` - 组件限定符
/// - `provides(dyn A, dyn B)` - 组件实现的接口
///
/// # 示例
///
/// ```rust,ignore
/// #[component(qualifier = "file", provides(dyn CommentRepository))]
/// impl FileCommentRepository {
///     pub fn new() -> Self {
///         Self::default()
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(args, input)
}
