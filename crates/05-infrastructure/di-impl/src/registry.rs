//! 组件注册表实现

use crate::context::{ContextImpl, ProviderMap};
use crate::injection::InjectionProvider;
use crate::scopes::{PooledProvider, SingletonProvider};
use crate::validation::DefaultDependencyGraphValidator;
use di_abstractions::{
    ComponentProvider, ComponentRegistry, DependencyGraph, DependencyGraphValidator, Implements,
    Injectable, InstanceProvider, ScopeFactory,
};
use infrastructure_common::{
    Annotation, ComponentError, ComponentIdentity, ComponentResult, ConfigResult, ContainerConfig,
    DependencyResult, IllegalComponentReason, Qualifier, ScopeKind, TypeInfo,
};
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 上下文配置
///
/// 绑定阶段的可变注册表。默认注册单例作用域，池化作用域需要显式注册。
pub struct ContextConfig {
    providers: ProviderMap,
    scopes: HashMap<ScopeKind, ScopeFactory>,
    validator: Box<dyn DependencyGraphValidator>,
    trace_resolution: bool,
}

impl ContextConfig {
    /// 创建新的注册表
    pub fn new() -> Self {
        let mut config = Self {
            providers: HashMap::new(),
            scopes: HashMap::new(),
            validator: Box::new(DefaultDependencyGraphValidator),
            trace_resolution: false,
        };
        config.register_scope(ScopeKind::singleton(), SingletonProvider::factory());
        config
    }

    /// 按容器配置创建注册表
    pub fn from_config(config: &ContainerConfig) -> ConfigResult<Self> {
        let mut registry = Self::new();
        if config.register_pooled_scope {
            registry.pooled_scope(config.pool_capacity()?);
        }
        registry.trace_resolution = config.trace_resolution;
        Ok(registry)
    }

    /// 注册池化作用域
    pub fn pooled_scope(&mut self, capacity: NonZeroUsize) -> &mut Self {
        self.register_scope(ScopeKind::pooled(), PooledProvider::factory(capacity));
        self
    }

    /// 替换依赖图验证器
    pub fn with_validator(mut self, validator: impl DependencyGraphValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// 是否以 debug 级别记录每次解析
    pub fn with_trace_resolution(mut self, enabled: bool) -> Self {
        self.trace_resolution = enabled;
        self
    }

    /// 已绑定的组件数量
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 是否没有任何绑定
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn register_scope(&mut self, scope: ScopeKind, factory: ScopeFactory) {
        if self.scopes.insert(scope, factory).is_some() {
            warn!("作用域已存在，将被覆盖: {}", scope);
        } else {
            info!("注册作用域: {}", scope);
        }
    }

    fn identities(type_info: TypeInfo, qualifiers: &[Qualifier]) -> Vec<ComponentIdentity> {
        if qualifiers.is_empty() {
            vec![ComponentIdentity::new(type_info, None)]
        } else {
            qualifiers
                .iter()
                .map(|qualifier| ComponentIdentity::new(type_info, Some(qualifier.clone())))
                .collect()
        }
    }

    fn insert(&mut self, identity: ComponentIdentity, provider: Arc<dyn ComponentProvider>) {
        if self.providers.contains_key(&identity) {
            warn!("组件已绑定，将被覆盖: {}", identity);
        }
        self.providers.insert(identity, provider);
    }

    fn decorate(
        &self,
        type_name: &'static str,
        scopes: Vec<ScopeKind>,
        provider: Box<dyn ComponentProvider>,
    ) -> ComponentResult<Box<dyn ComponentProvider>> {
        if scopes.len() > 1 {
            return Err(ComponentError::illegal(
                type_name,
                IllegalComponentReason::MultipleScopes { scopes },
            ));
        }

        match scopes.first() {
            None => Ok(provider),
            Some(scope) => {
                let factory = self.scopes.get(scope).ok_or_else(|| {
                    ComponentError::illegal(
                        type_name,
                        IllegalComponentReason::UnsupportedScope { scope: *scope },
                    )
                })?;
                Ok(factory(provider))
            }
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRegistry for ContextConfig {
    type Context = ContextImpl;

    fn bind_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind_instance_qualified(instance, &[])
    }

    fn bind_instance_qualified<T>(&mut self, instance: Arc<T>, qualifiers: &[Qualifier]) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_info = TypeInfo::of::<T>();
        info!("绑定实例: {}", type_info);
        let provider: Arc<dyn ComponentProvider> = Arc::new(InstanceProvider::new(instance));
        for identity in Self::identities(type_info, qualifiers) {
            self.insert(identity, Arc::clone(&provider));
        }
        self
    }

    fn bind_type_with<T, I>(&mut self, annotations: &[Annotation]) -> ComponentResult<&mut Self>
    where
        T: ?Sized + Send + Sync + 'static,
        I: Injectable + Implements<T>,
    {
        let descriptor = I::descriptor();
        let type_name = descriptor.type_info.name;

        let mut qualifiers = Vec::new();
        let mut scopes = Vec::new();
        for annotation in annotations {
            match annotation {
                Annotation::Qualifier(qualifier) => qualifiers.push(qualifier.clone()),
                Annotation::Scope(scope) => scopes.push(*scope),
            }
        }
        scopes.extend(descriptor.scopes.iter().copied());

        let type_info = TypeInfo::of::<T>();
        let identities = Self::identities(type_info, &qualifiers);

        // 每个限定符各自持有提供者与作用域装饰器，全部分析成功后才写入
        let mut descriptor = Some(descriptor);
        let mut bindings = Vec::with_capacity(identities.len());
        for identity in identities {
            let descriptor = descriptor.take().unwrap_or_else(I::descriptor);
            let provider = InjectionProvider::<I, T>::from_descriptor(descriptor)?;
            let provider = self.decorate(type_name, scopes.clone(), Box::new(provider))?;
            let provider: Arc<dyn ComponentProvider> = Arc::from(provider);
            bindings.push((identity, provider));
        }

        info!("绑定组件: {} -> {}", type_info, type_name);
        for (identity, provider) in bindings {
            self.insert(identity, provider);
        }
        Ok(self)
    }

    fn scope<F>(&mut self, scope: ScopeKind, factory: F) -> &mut Self
    where
        F: Fn(Box<dyn ComponentProvider>) -> Box<dyn ComponentProvider> + Send + Sync + 'static,
    {
        self.register_scope(scope, Arc::new(factory));
        self
    }

    fn get_context(&self) -> DependencyResult<ContextImpl> {
        let graph: DependencyGraph = self
            .providers
            .iter()
            .map(|(identity, provider)| (identity.clone(), provider.dependencies()))
            .collect();

        if let Err(e) = self.validator.validate(&graph) {
            error!("依赖图验证失败: {}", e);
            return Err(e);
        }

        info!("生成上下文完成，包含 {} 个组件", self.providers.len());
        Ok(ContextImpl::new(self.providers.clone(), self.trace_resolution))
    }

    fn is_bound(&self, identity: &ComponentIdentity) -> bool {
        self.providers.contains_key(identity)
    }

    fn bound_components(&self) -> Vec<ComponentIdentity> {
        self.providers.keys().cloned().collect()
    }
}

impl fmt::Debug for ContextConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextConfig")
            .field("components", &self.providers.keys().collect::<Vec<_>>())
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("trace_resolution", &self.trace_resolution)
            .finish()
    }
}
