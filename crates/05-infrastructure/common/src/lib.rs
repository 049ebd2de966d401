//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn DI 依赖注入容器的公共值类型与错误定义。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 以 `TypeId` 判等的类型信息
//! - [`ComponentIdentity`] - 组件标识（声明类型 + 可选限定符）
//! - [`ComponentRef`] - 组件引用（组件标识 + 可选间接包装）
//! - [`ScopeKind`] - 作用域标记
//! - [`ContainerConfig`] - 容器配置
//!
//! ## 设计原则
//!
//! - 所有标识均为结构化判等，可作为哈希键
//! - 错误以带结构化负载的枚举返回，而不是 panic

pub mod component;
pub mod configuration;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
