//! # 依赖注入具体实现
//!
//! 提供具体的组件注册表、注入分析器、作用域装饰器、依赖图验证器和解析上下文实现。
//!
//! ```rust
//! use di_abstractions::{ComponentRegistry, ContextExt};
//! use di_impl::ContextConfig;
//! use std::sync::Arc;
//!
//! let mut config = ContextConfig::new();
//! config.bind_instance(Arc::new(String::from("lorn")));
//!
//! let context = config.get_context().unwrap();
//! let name: Arc<String> = context.resolve().unwrap().unwrap();
//! assert_eq!(name.as_str(), "lorn");
//! ```

pub mod context;
pub mod injection;
pub mod registry;
pub mod scopes;
pub mod validation;

pub use context::ContextImpl;
pub use injection::InjectionProvider;
pub use registry::ContextConfig;
pub use scopes::{PooledProvider, SingletonProvider};
pub use validation::DefaultDependencyGraphValidator;
