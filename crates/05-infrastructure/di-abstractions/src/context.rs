//! 解析上下文抽象接口
//!
//! 上下文是验证通过后的只读视图，按组件引用解析实例或延迟句柄。

use crate::provider::{downcast_instance, Instance};
use infrastructure_common::{
    ComponentIdentity, ComponentRef, DependencyError, DependencyResult, IndirectionWrapper,
    Qualifier,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 解析上下文 trait
pub trait Context: Send + Sync {
    /// 按组件引用解析
    ///
    /// 组件未绑定或包装不受支持时返回 `Ok(None)`；
    /// 只有组件自身构造失败才返回错误。
    fn get(&self, reference: &ComponentRef) -> DependencyResult<Option<Resolved>>;
}

/// 延迟句柄，每次调用都回到上下文重新走一遍提供者
pub type DeferredHandle = Arc<dyn Fn() -> DependencyResult<Instance> + Send + Sync>;

/// 解析结果
#[derive(Clone)]
pub enum Resolved {
    /// 组件实例
    Instance(Instance),
    /// 延迟句柄
    Deferred(DeferredHandle),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Resolved::Instance(..)"),
            Self::Deferred(_) => f.write_str("Resolved::Deferred(..)"),
        }
    }
}

/// 延迟获取组件的提供者
///
/// 通过它注入的依赖不参与循环检测，可以安全地表达循环引用。
pub struct Provider<T: ?Sized> {
    handle: DeferredHandle,
    _component: PhantomData<fn() -> Arc<T>>,
}

impl<T> Provider<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    /// 从延迟句柄创建
    pub fn new(handle: DeferredHandle) -> Self {
        Self {
            handle,
            _component: PhantomData,
        }
    }

    /// 获取组件实例
    pub fn get(&self) -> DependencyResult<Arc<T>> {
        let instance = (self.handle)()?;
        downcast_instance::<T>(&instance).ok_or(DependencyError::TypeMismatch {
            expected: std::any::type_name::<T>(),
        })
    }
}

impl<T: ?Sized> Clone for Provider<T> {
    fn clone(&self) -> Self {
        Self {
            handle: Arc::clone(&self.handle),
            _component: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Provider<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Provider<{}>", std::any::type_name::<T>())
    }
}

/// 可被引用的消费者类型
///
/// 由消费者声明的类型形态推导组件引用：`Arc<T>` 直接引用，
/// `Provider<T>` 延迟引用，`Vec<Arc<T>>` 为不受支持的集合包装。
pub trait Referable: Sized + Send + Sync + 'static {
    /// 构造组件引用
    fn component_ref(qualifier: Option<Qualifier>) -> ComponentRef;

    /// 从解析结果转换
    fn from_resolved(resolved: Resolved) -> Option<Self>;
}

impl<T> Referable for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn component_ref(qualifier: Option<Qualifier>) -> ComponentRef {
        ComponentRef::direct(identity_of::<T>(qualifier))
    }

    fn from_resolved(resolved: Resolved) -> Option<Self> {
        match resolved {
            Resolved::Instance(instance) => downcast_instance::<T>(&instance),
            Resolved::Deferred(_) => None,
        }
    }
}

impl<T> Referable for Provider<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn component_ref(qualifier: Option<Qualifier>) -> ComponentRef {
        ComponentRef::wrapped(identity_of::<T>(qualifier), IndirectionWrapper::Provider)
    }

    fn from_resolved(resolved: Resolved) -> Option<Self> {
        match resolved {
            Resolved::Deferred(handle) => Some(Self::new(handle)),
            Resolved::Instance(_) => None,
        }
    }
}

impl<T> Referable for Vec<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn component_ref(qualifier: Option<Qualifier>) -> ComponentRef {
        ComponentRef::wrapped(
            identity_of::<T>(qualifier),
            IndirectionWrapper::Unsupported("Vec"),
        )
    }

    fn from_resolved(_resolved: Resolved) -> Option<Self> {
        None
    }
}

fn identity_of<T: ?Sized + 'static>(qualifier: Option<Qualifier>) -> ComponentIdentity {
    match qualifier {
        Some(qualifier) => ComponentIdentity::qualified::<T>(qualifier),
        None => ComponentIdentity::of::<T>(),
    }
}

/// 按消费者类型构造无限定符的组件引用
pub fn reference<R: Referable>() -> ComponentRef {
    R::component_ref(None)
}

/// 按消费者类型构造带限定符的组件引用
pub fn qualified_reference<R: Referable>(qualifier: Qualifier) -> ComponentRef {
    R::component_ref(Some(qualifier))
}

/// 类型化解析扩展
pub trait ContextExt {
    /// 解析无限定符的组件
    fn resolve<R: Referable>(&self) -> DependencyResult<Option<R>>;

    /// 解析带限定符的组件
    fn resolve_qualified<R: Referable>(&self, qualifier: Qualifier) -> DependencyResult<Option<R>>;
}

impl<C: Context + ?Sized> ContextExt for C {
    fn resolve<R: Referable>(&self) -> DependencyResult<Option<R>> {
        Ok(self.get(&reference::<R>())?.and_then(R::from_resolved))
    }

    fn resolve_qualified<R: Referable>(&self, qualifier: Qualifier) -> DependencyResult<Option<R>> {
        Ok(self
            .get(&qualified_reference::<R>(qualifier))?
            .and_then(R::from_resolved))
    }
}
