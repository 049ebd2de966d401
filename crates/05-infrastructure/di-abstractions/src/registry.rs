//! 组件注册表抽象接口

use crate::context::Context;
use crate::injection::Injectable;
use crate::provider::{ComponentProvider, Implements};
use infrastructure_common::{
    Annotation, ComponentIdentity, ComponentRef, ComponentResult, DependencyResult, Qualifier,
    ScopeKind,
};
use std::collections::HashMap;
use std::sync::Arc;

/// 组件注册表 trait
///
/// 可变的绑定阶段：注册实例、实现类型与作用域装饰器，
/// 最后通过 [`get_context`](ComponentRegistry::get_context) 验证依赖图并生成上下文。
pub trait ComponentRegistry {
    /// 生成的上下文类型
    type Context: Context;

    /// 绑定现成实例
    fn bind_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static;

    /// 在每个限定符下绑定同一个实例，限定符为空时等同于 [`bind_instance`](ComponentRegistry::bind_instance)
    fn bind_instance_qualified<T>(&mut self, instance: Arc<T>, qualifiers: &[Qualifier]) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static;

    /// 绑定实现类型
    fn bind_type<T, I>(&mut self) -> ComponentResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<T>,
    {
        self.bind_type_with::<T, I>(&[])
    }

    /// 带限定符或作用域参数绑定实现类型
    fn bind_type_with<T, I>(&mut self, annotations: &[Annotation]) -> ComponentResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<T>;

    /// 注册作用域装饰器工厂
    fn scope<F>(&mut self, scope: ScopeKind, factory: F) -> &mut Self
    where
        F: Fn(Box<dyn ComponentProvider>) -> Box<dyn ComponentProvider> + Send + Sync + 'static;

    /// 验证依赖图并生成上下文
    fn get_context(&self) -> DependencyResult<Self::Context>;

    /// 组件是否已绑定
    fn is_bound(&self, identity: &ComponentIdentity) -> bool;

    /// 所有已绑定的组件标识
    fn bound_components(&self) -> Vec<ComponentIdentity>;
}

/// 依赖图：组件标识到其声明依赖的映射
pub type DependencyGraph = HashMap<ComponentIdentity, Vec<ComponentRef>>;

/// 依赖图验证器
pub trait DependencyGraphValidator: Send + Sync {
    /// 检查缺失依赖与循环依赖
    fn validate(&self, graph: &DependencyGraph) -> DependencyResult<()>;
}
