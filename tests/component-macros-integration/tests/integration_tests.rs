//! 派生宏与容器的集成测试

use component_macros::Injectable;
use di_abstractions::{
    ComponentRegistry, ContextExt, DependencyError, IllegalComponentReason, Provider, Qualifier,
};
use di_impl::ContextConfig;
use infrastructure_common::ComponentIdentity;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub trait Component: Send + Sync {
    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        None
    }
}

pub trait Dependency: Send + Sync {}

struct DependencyInstance;
impl Dependency for DependencyInstance {}

#[derive(Injectable)]
#[component(implements = dyn Component)]
struct ComponentWithInjectConstructor {
    #[inject]
    dependency: Arc<dyn Dependency>,
}

impl Component for ComponentWithInjectConstructor {
    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        Some(Arc::clone(&self.dependency))
    }
}

#[derive(Injectable)]
#[component(implements = dyn Dependency)]
struct DependencyDependedOnComponent {
    #[inject]
    component: Arc<dyn Component>,
}

impl Dependency for DependencyDependedOnComponent {}

#[derive(Injectable)]
#[component(implements = dyn Dependency)]
struct DependencyWithProvider {
    #[inject]
    component: Provider<dyn Component>,
}

impl Dependency for DependencyWithProvider {}

#[derive(Injectable)]
#[component(pooled, implements = dyn Component)]
struct PooledComponent;

impl Component for PooledComponent {}

#[derive(Injectable)]
#[component(implements = dyn Component)]
struct DoubleQualified {
    #[inject]
    #[named("a")]
    #[named("b")]
    dependency: Arc<dyn Dependency>,
}

impl Component for DoubleQualified {}

/// 端到端：组件通过注入构造器获得绑定的实例
#[test]
fn test_component_receives_bound_instance() {
    let instance: Arc<dyn Dependency> = Arc::new(DependencyInstance);

    let mut config = ContextConfig::new();
    config.bind_instance(Arc::clone(&instance));
    config
        .bind_type::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap();

    let context = config.get_context().unwrap();
    let component: Arc<dyn Component> = context.resolve().unwrap().unwrap();
    assert!(Arc::ptr_eq(&component.dependency().unwrap(), &instance));
}

/// 端到端：依赖未绑定
#[test]
fn test_missing_dependency_fails_fast() {
    let mut config = ContextConfig::new();
    config
        .bind_type::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap();

    match config.get_context() {
        Err(DependencyError::DependencyNotFound {
            component,
            dependency,
        }) => {
            assert_eq!(component, ComponentIdentity::of::<dyn Component>());
            assert_eq!(dependency, ComponentIdentity::of::<dyn Dependency>());
        }
        other => panic!("期望 DependencyNotFound, 实际: {:?}", other.map(|_| ())),
    }
}

/// 直接循环依赖
#[test]
fn test_cyclic_dependency_detected() {
    let mut config = ContextConfig::new();
    config
        .bind_type::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap();
    config
        .bind_type::<dyn Dependency, DependencyDependedOnComponent>()
        .unwrap();

    let error = config.get_context().unwrap_err();
    let components = error.cycle_components().unwrap();
    assert_eq!(components.len(), 2);
}

/// 经由提供者的循环可以解析
#[test]
fn test_cycle_through_provider_resolves() {
    let mut config = ContextConfig::new();
    config
        .bind_type::<dyn Component, ComponentWithInjectConstructor>()
        .unwrap();
    config
        .bind_type::<dyn Dependency, DependencyWithProvider>()
        .unwrap();

    let context = config.get_context().unwrap();
    let component: Arc<dyn Component> = context.resolve().unwrap().unwrap();
    assert!(component.dependency().is_some());
}

/// 派生宏声明的池化作用域
#[test]
fn test_pooled_component_from_attribute() {
    let mut config = ContextConfig::new();
    config.pooled_scope(NonZeroUsize::new(2).unwrap());
    config.bind_type::<dyn Component, PooledComponent>().unwrap();

    let context = config.get_context().unwrap();
    let instances: Vec<Arc<dyn Component>> =
        (0..4).map(|_| context.resolve().unwrap().unwrap()).collect();
    assert!(Arc::ptr_eq(&instances[0], &instances[2]));
    assert!(Arc::ptr_eq(&instances[1], &instances[3]));
    assert!(!Arc::ptr_eq(&instances[0], &instances[1]));
}

/// 同一字段多个限定符在绑定时被拒绝
#[test]
fn test_double_qualified_field_rejected() {
    let mut config = ContextConfig::new();
    let error = config
        .bind_type::<dyn Component, DoubleQualified>()
        .err()
        .unwrap();
    assert!(matches!(
        error.reason(),
        IllegalComponentReason::MultipleQualifiers { .. }
    ));
}

/// 限定符绑定互不干扰
#[test]
fn test_qualified_bindings_are_independent() {
    let first: Arc<dyn Dependency> = Arc::new(DependencyInstance);
    let second: Arc<dyn Dependency> = Arc::new(DependencyInstance);

    let mut config = ContextConfig::new();
    config
        .bind_instance_qualified(Arc::clone(&first), &[Qualifier::named("first")])
        .bind_instance_qualified(Arc::clone(&second), &[Qualifier::named("second")]);

    let context = config.get_context().unwrap();
    let resolved_first: Arc<dyn Dependency> = context
        .resolve_qualified(Qualifier::named("first"))
        .unwrap()
        .unwrap();
    let resolved_second: Arc<dyn Dependency> = context
        .resolve_qualified(Qualifier::named("second"))
        .unwrap()
        .unwrap();

    assert!(Arc::ptr_eq(&resolved_first, &first));
    assert!(Arc::ptr_eq(&resolved_second, &second));
}
