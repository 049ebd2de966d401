//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件绑定、注入分析和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`ComponentProvider`] - 组件提供者接口
//! - [`Context`] - 解析上下文接口
//! - [`Injectable`] - 可注入组件接口
//! - [`DependencyGraphValidator`] - 依赖图验证接口

pub mod context;
pub mod injection;
pub mod provider;
pub mod registry;

pub use context::*;
pub use injection::*;
pub use provider::*;
pub use registry::*;

pub use infrastructure_common::{
    Annotation, ComponentError, ComponentIdentity, ComponentRef, ComponentResult,
    DependencyError, DependencyResult, IllegalComponentReason, IndirectionWrapper, Named,
    Pooled, Qualifier, QualifierMarker, ScopeKind, ScopeMarker, Singleton, TypeInfo,
};
