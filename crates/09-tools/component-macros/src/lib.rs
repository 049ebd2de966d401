//! # Component Macros
//!
//! 这个 crate 提供了生成注入描述符的派生宏。
//!
//! ## 核心宏
//!
//! - [`Injectable`](derive@Injectable) - 生成 `di_abstractions::Injectable` 实现
//!
//! ## 使用示例
//!
//! ```rust
//! use component_macros::Injectable;
//! use di_abstractions::Provider;
//! use std::sync::Arc;
//!
//! pub trait Engine: Send + Sync {}
//! pub trait Car: Send + Sync {}
//!
//! #[derive(Injectable)]
//! #[component(singleton, implements = dyn Car)]
//! pub struct SportsCar {
//!     #[inject]
//!     #[named("V8")]
//!     engine: Arc<dyn Engine>,
//!     #[inject]
//!     spare: Provider<dyn Engine>,
//!     mileage: u64,
//! }
//!
//! impl Car for SportsCar {}
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

/// 可注入组件派生宏
///
/// 为结构体生成注入描述符：标记 `#[inject]` 的字段作为注入构造器的参数，
/// 其余字段使用 `Default::default()` 初始化。
///
/// # 字段属性
///
/// - `#[inject]` - 注入点
/// - `#[named("value")]` - 命名限定符
/// - `#[qualifier(Marker)]` - 标记限定符
///
/// # 结构体属性
///
/// - `#[component(singleton)]` - 单例作用域
/// - `#[component(pooled)]` - 池化作用域
/// - `#[component(scope = Marker)]` - 自定义作用域
/// - `#[component(implements = dyn Trait)]` - 可以作为 `dyn Trait` 绑定
#[proc_macro_derive(Injectable, attributes(inject, named, qualifier, component))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_injectable_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
