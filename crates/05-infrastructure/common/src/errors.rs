//! 错误类型定义

use crate::component::ComponentIdentity;
use crate::lifecycle::ScopeKind;
use std::collections::HashSet;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 非法组件原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalComponentReason {
    #[error("抽象类型无法实例化")]
    AbstractComponent,

    #[error("存在多个注入构造器")]
    AmbiguousConstructor,

    #[error("既没有注入构造器也没有无参构造器")]
    NoUsableConstructor,

    #[error("注入字段不可为 final: {field}")]
    FinalInjectField { field: &'static str },

    #[error("注入方法不可声明类型参数: {method}")]
    GenericInjectMethod { method: &'static str },

    #[error("注入点声明了多个限定符: {point}")]
    MultipleQualifiers { point: String },

    #[error("声明了多个作用域: {}", display_scopes(.scopes))]
    MultipleScopes { scopes: Vec<ScopeKind> },

    #[error("作用域未注册: {scope}")]
    UnsupportedScope { scope: ScopeKind },
}

/// 组件错误类型
///
/// 绑定阶段发现的静态形态错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("非法组件: {type_name}, 原因: {reason}")]
    IllegalComponent {
        type_name: &'static str,
        reason: IllegalComponentReason,
    },
}

impl ComponentError {
    /// 创建非法组件错误
    pub fn illegal(type_name: &'static str, reason: IllegalComponentReason) -> Self {
        Self::IllegalComponent { type_name, reason }
    }

    /// 非法原因
    pub fn reason(&self) -> &IllegalComponentReason {
        match self {
            Self::IllegalComponent { reason, .. } => reason,
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("依赖未找到: 组件 {component} 依赖的 {dependency} 未绑定")]
    DependencyNotFound {
        component: ComponentIdentity,
        dependency: ComponentIdentity,
    },

    #[error("检测到循环依赖: {}", display_path(.path))]
    CyclicDependency { path: Vec<ComponentIdentity> },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },

    #[error("组件类型不匹配: 期望 {expected}")]
    TypeMismatch { expected: &'static str },
}

impl DependencyError {
    /// 创建组件创建失败错误
    ///
    /// 组件自身的构造、字段赋值或方法调用失败时使用。
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 循环依赖中涉及的全部组件（去重）
    pub fn cycle_components(&self) -> Option<HashSet<&ComponentIdentity>> {
        match self {
            Self::CyclicDependency { path } => Some(path.iter().collect()),
            _ => None,
        }
    }
}

fn display_path(path: &[ComponentIdentity]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn display_scopes(scopes: &[ScopeKind]) -> String {
    scopes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
