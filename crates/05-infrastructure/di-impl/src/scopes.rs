//! 作用域装饰器
//!
//! 装饰器包装基础提供者，只改变实例复用策略，依赖声明原样透传。

use di_abstractions::{ComponentProvider, Context, Instance, ScopeFactory};
use infrastructure_common::{ComponentRef, DependencyError, DependencyResult};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// 单例提供者
///
/// 第一次调用时创建并缓存实例，此后总是返回同一个实例。
/// 并发的首次调用只会有一个线程执行创建。
pub struct SingletonProvider {
    inner: Box<dyn ComponentProvider>,
    instance: OnceCell<Instance>,
}

impl SingletonProvider {
    /// 包装基础提供者
    pub fn new(inner: Box<dyn ComponentProvider>) -> Self {
        Self {
            inner,
            instance: OnceCell::new(),
        }
    }

    /// 单例作用域工厂
    pub fn factory() -> ScopeFactory {
        Arc::new(
            |inner: Box<dyn ComponentProvider>| -> Box<dyn ComponentProvider> {
                Box::new(SingletonProvider::new(inner))
            },
        )
    }
}

impl ComponentProvider for SingletonProvider {
    fn get(&self, context: &dyn Context) -> DependencyResult<Instance> {
        self.instance
            .get_or_try_init(|| self.inner.get(context))
            .map(Arc::clone)
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}

struct PoolState {
    pool: Vec<Instance>,
    cursor: usize,
}

/// 池化提供者
///
/// 前 `capacity` 次调用各创建一个新实例放入池中，之后按游标轮流返回池中实例。
/// 创建实例期间持有池锁，构造过程中经由提供者同步解析自身会死锁。
pub struct PooledProvider {
    inner: Box<dyn ComponentProvider>,
    capacity: NonZeroUsize,
    state: Mutex<PoolState>,
}

impl PooledProvider {
    /// 包装基础提供者
    pub fn new(inner: Box<dyn ComponentProvider>, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            capacity,
            state: Mutex::new(PoolState {
                pool: Vec::with_capacity(capacity.get()),
                cursor: 0,
            }),
        }
    }

    /// 池化作用域工厂
    pub fn factory(capacity: NonZeroUsize) -> ScopeFactory {
        Arc::new(
            move |inner: Box<dyn ComponentProvider>| -> Box<dyn ComponentProvider> {
                Box::new(PooledProvider::new(inner, capacity))
            },
        )
    }

    /// 池容量
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl ComponentProvider for PooledProvider {
    fn get(&self, context: &dyn Context) -> DependencyResult<Instance> {
        let capacity = self.capacity.get();
        let mut state = self.state.lock();

        if state.pool.len() < capacity {
            let instance = self.inner.get(context)?;
            state.pool.push(instance);
        }

        let index = state.cursor;
        state.cursor = (state.cursor + 1) % capacity;
        state
            .pool
            .get(index)
            .cloned()
            .ok_or_else(|| DependencyError::DependencyResolutionFailed {
                type_name: "PooledProvider".to_string(),
                message: format!("池中不存在索引 {} 的实例", index),
            })
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.inner.dependencies()
    }
}
