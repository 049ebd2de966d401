//! 依赖注入实现的集中集成测试

use anyhow::Result;
use di_abstractions::{
    implements, reference, Annotation, Args, ComponentRegistry, ConstructorPoint, Context,
    ContextExt, DependencyError, FieldPoint, Injectable, InjectionDescriptor, MemberLayer,
    MethodPoint, Param, Provider, Qualifier, ScopeKind,
};
use di_impl::ContextConfig;
use infrastructure_common::{ComponentIdentity, ComponentRef};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub trait Component: Send + Sync {
    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        None
    }
}

pub trait Dependency: Send + Sync {}

pub trait AnotherDependency: Send + Sync {}

struct DependencyInstance;
impl Dependency for DependencyInstance {}

/// 依赖 Dependency 的组件
struct ComponentWithInjectConstructor {
    dependency: Arc<dyn Dependency>,
}

impl Component for ComponentWithInjectConstructor {
    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        Some(Arc::clone(&self.dependency))
    }
}

implements!(ComponentWithInjectConstructor => dyn Component);

impl Injectable for ComponentWithInjectConstructor {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::inject(
            vec![Param::of::<Arc<dyn Dependency>>("dependency")],
            |args: &mut Args| {
                Ok(Self {
                    dependency: args.take()?,
                })
            },
        ))
    }
}

/// 依赖 AnotherDependency 的 Dependency
struct DependencyDependedOnAnother;
impl Dependency for DependencyDependedOnAnother {}

implements!(DependencyDependedOnAnother => dyn Dependency);

impl Injectable for DependencyDependedOnAnother {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::inject(
            vec![Param::of::<Arc<dyn AnotherDependency>>("another")],
            |args: &mut Args| {
                let _another: Arc<dyn AnotherDependency> = args.take()?;
                Ok(Self)
            },
        ))
    }
}

/// 依赖 Component 的 AnotherDependency
struct AnotherDependedOnComponent;
impl AnotherDependency for AnotherDependedOnComponent {}

implements!(AnotherDependedOnComponent => dyn AnotherDependency);

impl Injectable for AnotherDependedOnComponent {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::inject(
            vec![Param::of::<Arc<dyn Component>>("component")],
            |args: &mut Args| {
                let _component: Arc<dyn Component> = args.take()?;
                Ok(Self)
            },
        ))
    }
}

/// 直接依赖 Component 的 Dependency
struct DependencyDependedOnComponent;
impl Dependency for DependencyDependedOnComponent {}

implements!(DependencyDependedOnComponent => dyn Dependency);

impl Injectable for DependencyDependedOnComponent {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::inject(
            vec![Param::of::<Arc<dyn Component>>("component")],
            |args: &mut Args| {
                let _component: Arc<dyn Component> = args.take()?;
                Ok(Self)
            },
        ))
    }
}

/// 通过提供者延迟依赖 Component 的 Dependency
struct DependencyWithProvider {
    component: Provider<dyn Component>,
}
impl Dependency for DependencyWithProvider {}

implements!(DependencyWithProvider => dyn Dependency);

impl Injectable for DependencyWithProvider {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::inject(
            vec![Param::of::<Provider<dyn Component>>("component")],
            |args: &mut Args| {
                Ok(Self {
                    component: args.take()?,
                })
            },
        ))
    }
}

/// 无依赖组件
struct PlainComponent;
impl Component for PlainComponent {}

implements!(PlainComponent => dyn Component);

impl Injectable for PlainComponent {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::no_args(|| PlainComponent))
    }
}

fn instance_address<T: ?Sized>(instance: &Arc<T>) -> usize {
    Arc::as_ptr(instance) as *const () as usize
}

/// 合法的依赖图中每个无限定符组件都能解析
#[test]
fn test_valid_graph_resolves_every_component() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_instance::<dyn Dependency>(Arc::new(DependencyInstance));
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;
    config.bind_instance(Arc::new(String::from("name")));

    let context = config.get_context()?;
    for identity in config.bound_components() {
        let resolved = context.get(&ComponentRef::direct(identity.clone()))?;
        assert!(resolved.is_some(), "{} 应当可以解析", identity);
    }
    Ok(())
}

/// 端到端：组件拿到绑定的同一个实例
#[test]
fn test_component_dependency_is_bound_instance() -> Result<()> {
    let instance: Arc<dyn Dependency> = Arc::new(DependencyInstance);

    let mut config = ContextConfig::new();
    config.bind_instance(Arc::clone(&instance));
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;

    let component: Arc<dyn Component> = config
        .get_context()?
        .resolve()?
        .expect("Component 应当已绑定");
    let dependency = component.dependency().expect("依赖应当已注入");
    assert_eq!(instance_address(&dependency), instance_address(&instance));
    Ok(())
}

/// 传递缺失依赖报告直接请求者
#[test]
fn test_transitive_missing_dependency() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;
    config.bind_type::<dyn Dependency, DependencyDependedOnAnother>()?;

    match config.get_context() {
        Err(DependencyError::DependencyNotFound {
            component,
            dependency,
        }) => {
            assert_eq!(component, ComponentIdentity::of::<dyn Dependency>());
            assert_eq!(dependency, ComponentIdentity::of::<dyn AnotherDependency>());
        }
        other => panic!("期望 DependencyNotFound, 实际: {:?}", other.map(|_| ())),
    }
    Ok(())
}

/// 两个组件互相依赖
#[test]
fn test_two_cycle() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;
    config.bind_type::<dyn Dependency, DependencyDependedOnComponent>()?;

    let error = config.get_context().unwrap_err();
    let expected: HashSet<_> = [
        ComponentIdentity::of::<dyn Component>(),
        ComponentIdentity::of::<dyn Dependency>(),
    ]
    .into_iter()
    .collect();
    let actual: HashSet<_> = error
        .cycle_components()
        .expect("应当是循环依赖")
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(actual, expected);
    Ok(())
}

/// 三个组件的传递循环
#[test]
fn test_transitive_cycle() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;
    config.bind_type::<dyn Dependency, DependencyDependedOnAnother>()?;
    config.bind_type::<dyn AnotherDependency, AnotherDependedOnComponent>()?;

    let error = config.get_context().unwrap_err();
    let actual: HashSet<_> = error
        .cycle_components()
        .expect("应当是循环依赖")
        .into_iter()
        .cloned()
        .collect();
    let expected: HashSet<_> = [
        ComponentIdentity::of::<dyn Component>(),
        ComponentIdentity::of::<dyn Dependency>(),
        ComponentIdentity::of::<dyn AnotherDependency>(),
    ]
    .into_iter()
    .collect();
    assert_eq!(actual, expected);
    Ok(())
}

/// 经由提供者的循环不报错，并且可以解析
#[test]
fn test_cycle_through_provider() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;
    config.bind_type::<dyn Dependency, DependencyWithProvider>()?;

    let context = config.get_context()?;
    let component: Arc<dyn Component> = context.resolve()?.expect("Component 应当已绑定");
    assert!(component.dependency().is_some());

    Ok(())
}

/// 延迟句柄在循环中解析回组件
#[test]
fn test_deferred_handle_inside_cycle() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, ComponentWithInjectConstructor>()?;
    config.bind_type::<dyn Dependency, DependencyWithProvider>()?;
    config.bind_type::<DependencyWithProvider, DependencyWithProvider>()?;

    let context = config.get_context()?;
    let dependency: Arc<DependencyWithProvider> =
        context.resolve()?.expect("DependencyWithProvider 应当已绑定");
    let component = dependency.component.get()?;
    assert!(component.dependency().is_some());
    Ok(())
}

/// 延迟句柄每次调用都重新走提供者
#[test]
fn test_provider_handle_resolves_lazily() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, PlainComponent>()?;

    let context = config.get_context()?;
    let provider: Provider<dyn Component> = context.resolve()?.expect("Component 应当已绑定");
    let first = provider.get()?;
    let second = provider.get()?;
    assert_ne!(instance_address(&first), instance_address(&second));
    Ok(())
}

/// 单例作用域返回同一实例，默认作用域每次返回新实例
#[test]
fn test_singleton_versus_default_scope() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type::<dyn Component, PlainComponent>()?;
    config.bind_type_with::<PlainComponent, PlainComponent>(&[Annotation::Scope(
        ScopeKind::singleton(),
    )])?;

    let context = config.get_context()?;

    let first: Arc<dyn Component> = context.resolve()?.expect("Component 应当已绑定");
    let second: Arc<dyn Component> = context.resolve()?.expect("Component 应当已绑定");
    assert_ne!(instance_address(&first), instance_address(&second));

    let first: Arc<PlainComponent> = context.resolve()?.expect("PlainComponent 应当已绑定");
    let second: Arc<PlainComponent> = context.resolve()?.expect("PlainComponent 应当已绑定");
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

/// 池化作用域在 N+k 次调用中只产生 N 个实例
#[test]
fn test_pooled_scope_distinct_count() -> Result<()> {
    let capacity = 3;
    let mut config = ContextConfig::new();
    config.pooled_scope(NonZeroUsize::new(capacity).expect("容量大于 0"));
    config.bind_type_with::<dyn Component, PlainComponent>(&[Annotation::Scope(
        ScopeKind::pooled(),
    )])?;

    let context = config.get_context()?;
    let mut distinct = HashSet::new();
    for _ in 0..capacity + 4 {
        let instance: Arc<dyn Component> = context.resolve()?.expect("Component 应当已绑定");
        distinct.insert(instance_address(&instance));
    }
    assert_eq!(distinct.len(), capacity);
    Ok(())
}

/// 同一类型在两个限定符下绑定，解析时互不干扰
#[test]
fn test_qualified_type_bindings() -> Result<()> {
    let chosen: Arc<dyn Dependency> = Arc::new(DependencyInstance);
    let skywalker: Arc<dyn Dependency> = Arc::new(DependencyInstance);

    let mut config = ContextConfig::new();
    config.bind_instance_qualified(Arc::clone(&chosen), &[Qualifier::named("ChosenOne")]);
    config.bind_instance_qualified(Arc::clone(&skywalker), &[Qualifier::named("Skywalker")]);
    config.bind_type_with::<dyn Component, QualifiedComponent>(&[Annotation::Qualifier(
        Qualifier::named("ChosenOne"),
    )])?;
    config.bind_type_with::<dyn Component, QualifiedComponent>(&[Annotation::Qualifier(
        Qualifier::named("Skywalker"),
    )])?;

    let context = config.get_context()?;
    let resolved: Arc<dyn Dependency> = context
        .resolve_qualified(Qualifier::named("Skywalker"))?
        .expect("Skywalker 应当已绑定");
    assert_eq!(instance_address(&resolved), instance_address(&skywalker));

    let component: Arc<dyn Component> = context
        .resolve_qualified(Qualifier::named("ChosenOne"))?
        .expect("ChosenOne 组件应当已绑定");
    let dependency = component.dependency().expect("依赖应当已注入");
    assert_eq!(instance_address(&dependency), instance_address(&chosen));

    assert!(context.resolve::<Arc<dyn Component>>()?.is_none());
    Ok(())
}

/// 一次绑定在多个限定符下注册同一实现
#[test]
fn test_bind_type_with_multiple_qualifiers() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type_with::<dyn Component, PlainComponent>(&[
        Qualifier::named("ChosenOne").into(),
        Qualifier::named("Skywalker").into(),
    ])?;

    assert!(config.is_bound(&ComponentIdentity::qualified::<dyn Component>(
        Qualifier::named("ChosenOne")
    )));
    assert!(config.is_bound(&ComponentIdentity::qualified::<dyn Component>(
        Qualifier::named("Skywalker")
    )));
    assert!(!config.is_bound(&ComponentIdentity::of::<dyn Component>()));

    let context = config.get_context()?;
    for name in ["ChosenOne", "Skywalker"] {
        let component: Option<Arc<dyn Component>> =
            context.resolve_qualified(Qualifier::named(name))?;
        assert!(component.is_some());
    }
    Ok(())
}

/// 多限定符单例：限定符内共享，限定符间独立
#[test]
fn test_singleton_per_qualifier() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_type_with::<dyn Component, PlainComponent>(&[
        Qualifier::named("ChosenOne").into(),
        Qualifier::named("Skywalker").into(),
        ScopeKind::singleton().into(),
    ])?;

    let context = config.get_context()?;
    let resolve = |name: &str| -> Result<Arc<dyn Component>> {
        Ok(context
            .resolve_qualified(Qualifier::named(name))?
            .expect("组件应当已绑定"))
    };

    let chosen = resolve("ChosenOne")?;
    let skywalker = resolve("Skywalker")?;
    assert_eq!(instance_address(&chosen), instance_address(&resolve("ChosenOne")?));
    assert_eq!(instance_address(&skywalker), instance_address(&resolve("Skywalker")?));
    assert_ne!(instance_address(&chosen), instance_address(&skywalker));
    Ok(())
}

/// 多限定符池化：每个限定符各自持有实例池
#[test]
fn test_pool_per_qualifier() -> Result<()> {
    let capacity = 2;
    let mut config = ContextConfig::new();
    config.pooled_scope(NonZeroUsize::new(capacity).expect("容量大于 0"));
    config.bind_type_with::<dyn Component, PlainComponent>(&[
        Qualifier::named("ChosenOne").into(),
        Qualifier::named("Skywalker").into(),
        ScopeKind::pooled().into(),
    ])?;

    let context = config.get_context()?;
    let mut pools = Vec::new();
    for name in ["ChosenOne", "Skywalker"] {
        let mut distinct = HashSet::new();
        for _ in 0..capacity + 3 {
            let instance: Arc<dyn Component> = context
                .resolve_qualified(Qualifier::named(name))?
                .expect("组件应当已绑定");
            distinct.insert(instance_address(&instance));
        }
        assert_eq!(distinct.len(), capacity);
        pools.push(distinct);
    }
    assert!(pools[0].is_disjoint(&pools[1]));
    Ok(())
}

/// 注入带限定符依赖的组件
struct QualifiedComponent {
    dependency: Arc<dyn Dependency>,
}

impl Component for QualifiedComponent {
    fn dependency(&self) -> Option<Arc<dyn Dependency>> {
        Some(Arc::clone(&self.dependency))
    }
}

implements!(QualifiedComponent => dyn Component);

impl Injectable for QualifiedComponent {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new().with_constructor(ConstructorPoint::inject(
            vec![Param::of::<Arc<dyn Dependency>>("dependency")
                .qualified(Qualifier::named("ChosenOne"))],
            |args: &mut Args| {
                Ok(Self {
                    dependency: args.take()?,
                })
            },
        ))
    }
}

/// 不支持的包装即使组件已绑定也返回空
#[test]
fn test_unsupported_wrapper_resolves_empty() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_instance::<dyn Dependency>(Arc::new(DependencyInstance));

    let context = config.get_context()?;
    assert!(context.get(&reference::<Vec<Arc<dyn Dependency>>>())?.is_none());
    Ok(())
}

/// 字段先于方法注入，基础层先于派生层
#[derive(Default)]
struct Layered {
    steps: Vec<String>,
    dependency: Option<Arc<dyn Dependency>>,
}

impl Injectable for Layered {
    fn descriptor() -> InjectionDescriptor<Self> {
        InjectionDescriptor::new()
            .with_constructor(ConstructorPoint::no_args(Layered::default))
            .with_layer(
                MemberLayer::new("Base")
                    .with_field(FieldPoint::inject(
                        "dependency",
                        |target: &mut Layered, value: Arc<dyn Dependency>| {
                            target.steps.push("field".to_string());
                            target.dependency = Some(value);
                        },
                    ))
                    .with_method(MethodPoint::inject(
                        "install",
                        vec![Param::of::<Arc<dyn Dependency>>("dependency")],
                        |target: &mut Layered, args: &mut Args| {
                            let _: Arc<dyn Dependency> = args.take()?;
                            target.steps.push("base install".to_string());
                            Ok(())
                        },
                    ))
                    .with_method(MethodPoint::inject(
                        "configure",
                        Vec::new(),
                        |target: &mut Layered, _: &mut Args| {
                            target.steps.push("base configure".to_string());
                            Ok(())
                        },
                    )),
            )
            .with_layer(
                MemberLayer::new("Derived")
                    .with_method(MethodPoint::inject(
                        "install",
                        vec![Param::of::<Arc<dyn Dependency>>("dependency")],
                        |target: &mut Layered, _: &mut Args| {
                            target.steps.push("derived install".to_string());
                            Ok(())
                        },
                    ))
                    .with_method(MethodPoint::plain("configure", Vec::new())),
            )
    }
}

/// 方法覆写规则经过注册表依然成立
#[test]
fn test_member_injection_order_through_registry() -> Result<()> {
    let mut config = ContextConfig::new();
    config.bind_instance::<dyn Dependency>(Arc::new(DependencyInstance));
    config.bind_type::<Layered, Layered>()?;

    let layered: Arc<Layered> = config.get_context()?.resolve()?.expect("Layered 应当已绑定");
    assert_eq!(layered.steps, vec!["field", "derived install"]);
    assert!(layered.dependency.is_some());
    Ok(())
}
