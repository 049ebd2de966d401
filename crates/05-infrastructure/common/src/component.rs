//! 组件标识定义
//!
//! 组件标识 = (声明类型, 可选限定符)，组件引用在此基础上携带可选的间接包装。
//! 所有类型均为结构化判等，独立构造的相同引用彼此相等。

use crate::lifecycle::ScopeKind;
use crate::metadata::TypeInfo;
use std::collections::BTreeMap;
use std::fmt;

/// 限定符标记 trait
///
/// 实现此 trait 的类型可以作为限定符标记使用。
pub trait QualifierMarker: Send + Sync + 'static {}

/// 内置的命名限定符标记
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Named;

impl QualifierMarker for Named {}

/// 限定符
///
/// 同一类型的多个绑定通过限定符区分。判等基于标记类型与属性值，
/// 而不是对象身份。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qualifier {
    marker: TypeInfo,
    attributes: BTreeMap<&'static str, String>,
}

impl Qualifier {
    /// 创建仅包含标记的限定符
    pub fn of<M: QualifierMarker>() -> Self {
        Self {
            marker: TypeInfo::of::<M>(),
            attributes: BTreeMap::new(),
        }
    }

    /// 创建命名限定符
    pub fn named(value: impl Into<String>) -> Self {
        Self::of::<Named>().with_attribute("value", value)
    }

    /// 添加属性
    pub fn with_attribute(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value.into());
        self
    }

    /// 限定符标记类型
    pub fn marker(&self) -> TypeInfo {
        self.marker
    }

    /// 获取属性值
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.marker)?;
        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(|(key, value)| format!("{key}=\"{value}\""))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "({attributes})")?;
        }
        Ok(())
    }
}

/// 绑定参数
///
/// 类型绑定时传入的限定符或作用域标记。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// 限定符
    Qualifier(Qualifier),
    /// 作用域
    Scope(ScopeKind),
}

impl From<Qualifier> for Annotation {
    fn from(qualifier: Qualifier) -> Self {
        Self::Qualifier(qualifier)
    }
}

impl From<ScopeKind> for Annotation {
    fn from(scope: ScopeKind) -> Self {
        Self::Scope(scope)
    }
}

/// 组件标识
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentIdentity {
    type_info: TypeInfo,
    qualifier: Option<Qualifier>,
}

impl ComponentIdentity {
    /// 创建新的组件标识
    pub fn new(type_info: TypeInfo, qualifier: Option<Qualifier>) -> Self {
        Self {
            type_info,
            qualifier,
        }
    }

    /// 无限定符的组件标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeInfo::of::<T>(), None)
    }

    /// 带限定符的组件标识
    pub fn qualified<T: ?Sized + 'static>(qualifier: Qualifier) -> Self {
        Self::new(TypeInfo::of::<T>(), Some(qualifier))
    }

    /// 声明类型
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 限定符
    pub fn qualifier(&self) -> Option<&Qualifier> {
        self.qualifier.as_ref()
    }
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{qualifier} {}", self.type_info),
            None => write!(f, "{}", self.type_info),
        }
    }
}

/// 间接包装
///
/// 消费者请求“延迟获取”形式而不是组件本身时携带。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndirectionWrapper {
    /// 延迟提供者，容器支持
    Provider,
    /// 容器不支持的包装（例如集合），永远解析为空
    Unsupported(&'static str),
}

impl IndirectionWrapper {
    /// 容器是否支持此包装
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Provider)
    }
}

impl fmt::Display for IndirectionWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => f.write_str("Provider"),
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

/// 组件引用
///
/// 查找键：组件标识加上可选的间接包装。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    component: ComponentIdentity,
    wrapper: Option<IndirectionWrapper>,
}

impl ComponentRef {
    /// 直接引用组件
    pub fn direct(component: ComponentIdentity) -> Self {
        Self {
            component,
            wrapper: None,
        }
    }

    /// 通过包装引用组件
    pub fn wrapped(component: ComponentIdentity, wrapper: IndirectionWrapper) -> Self {
        Self {
            component,
            wrapper: Some(wrapper),
        }
    }

    /// 被引用的组件标识
    pub fn component(&self) -> &ComponentIdentity {
        &self.component
    }

    /// 间接包装
    pub fn wrapper(&self) -> Option<IndirectionWrapper> {
        self.wrapper
    }

    /// 是否通过包装引用
    pub fn is_wrapped(&self) -> bool {
        self.wrapper.is_some()
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wrapper {
            Some(wrapper) => write!(f, "{wrapper}<{}>", self.component),
            None => write!(f, "{}", self.component),
        }
    }
}
