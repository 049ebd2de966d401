//! 组件提供者抽象接口
//!
//! 提供者是一个给定解析上下文即可产出实例的函数，
//! 同时声明自己的依赖以供依赖图验证使用。

use crate::context::Context;
use infrastructure_common::{ComponentRef, DependencyResult};
use std::any::Any;
use std::sync::Arc;

/// 组件实例
///
/// 内部保存声明类型 `T` 的 `Arc<T>`，`T` 可以是 `dyn Trait`。
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 将声明类型的实例包装为容器实例
pub fn into_instance<T>(value: Arc<T>) -> Instance
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(value)
}

/// 从容器实例中取回声明类型的实例
pub fn downcast_instance<T>(instance: &Instance) -> Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance.downcast_ref::<Arc<T>>().cloned()
}

/// 组件提供者 trait
pub trait ComponentProvider: Send + Sync {
    /// 在给定上下文中产出实例
    fn get(&self, context: &dyn Context) -> DependencyResult<Instance>;

    /// 声明的依赖，仅用于依赖图验证
    fn dependencies(&self) -> Vec<ComponentRef> {
        Vec::new()
    }
}

impl<P: ComponentProvider + ?Sized> ComponentProvider for Box<P> {
    fn get(&self, context: &dyn Context) -> DependencyResult<Instance> {
        (**self).get(context)
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        (**self).dependencies()
    }
}

/// 作用域装饰器工厂
///
/// 接收基础提供者，返回套上缓存或生命周期策略的提供者。
pub type ScopeFactory =
    Arc<dyn Fn(Box<dyn ComponentProvider>) -> Box<dyn ComponentProvider> + Send + Sync>;

/// 实现类型到声明类型的转换
///
/// 每个类型都实现了到自身的转换；实现 trait 对象时使用
/// [`implements!`](crate::implements) 或 `#[component(implements = ...)]` 声明。
pub trait Implements<T: ?Sized>: Send + Sync + 'static {
    /// 将实现类型的实例转换为声明类型
    fn upcast(self: Arc<Self>) -> Arc<T>;
}

impl<T: Send + Sync + 'static> Implements<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// 声明实现类型可以作为哪些 trait 对象绑定
///
/// ```rust
/// use di_abstractions::implements;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// implements!(SystemClock => dyn Clock);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($declared:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$declared> for $implementation {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$declared> {
                    self
                }
            }
        )+
    };
}

/// 固定实例提供者
///
/// 忽略上下文，直接返回绑定时给出的实例。
pub struct InstanceProvider {
    instance: Instance,
}

impl InstanceProvider {
    /// 创建固定实例提供者
    pub fn new<T>(instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            instance: into_instance(instance),
        }
    }
}

impl ComponentProvider for InstanceProvider {
    fn get(&self, _context: &dyn Context) -> DependencyResult<Instance> {
        Ok(Arc::clone(&self.instance))
    }
}

impl std::fmt::Debug for InstanceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceProvider")
            .field("instance", &"<instance>")
            .finish()
    }
}
