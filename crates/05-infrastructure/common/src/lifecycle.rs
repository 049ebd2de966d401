//! 组件生命周期管理
//!
//! 作用域决定组件实例的复用策略：默认每次解析都创建新实例，
//! 作用域标记则让绑定在注册时套上对应的作用域装饰器。

use crate::metadata::TypeInfo;
use std::fmt;

/// 作用域标记 trait
///
/// 任何实现此 trait 的类型都可以作为作用域标记使用，
/// 对应的装饰器需要通过注册表的 `scope` 方法注册。
pub trait ScopeMarker: Send + Sync + 'static {}

/// 单例作用域标记，注册表默认支持
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Singleton;

impl ScopeMarker for Singleton {}

/// 池化作用域标记，需要显式注册装饰器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Pooled;

impl ScopeMarker for Pooled {}

/// 作用域类型
///
/// 以标记类型区分不同作用域。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeKind {
    marker: TypeInfo,
}

impl ScopeKind {
    /// 从标记类型创建作用域
    pub fn of<M: ScopeMarker>() -> Self {
        Self {
            marker: TypeInfo::of::<M>(),
        }
    }

    /// 单例作用域
    pub fn singleton() -> Self {
        Self::of::<Singleton>()
    }

    /// 池化作用域
    pub fn pooled() -> Self {
        Self::of::<Pooled>()
    }

    /// 作用域标记类型
    pub fn marker(&self) -> TypeInfo {
        self.marker
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.marker)
    }
}
