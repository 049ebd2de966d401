//! 注入分析器
//!
//! 在绑定时分析一次实现类型的注入描述符，生成基础提供者。

use di_abstractions::{
    into_instance, Args, ComponentProvider, ConstructorPoint, Context, FieldPoint, Implements,
    Injectable, InjectionDescriptor, InjectionPoint, Instance, MemberKind, MethodPoint, Param,
    Resolved,
};
use infrastructure_common::{
    ComponentError, ComponentRef, ComponentResult, DependencyError, DependencyResult,
    IllegalComponentReason, TypeInfo,
};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

struct AnalyzedField<I> {
    point: FieldPoint<I>,
    reference: ComponentRef,
}

struct AnalyzedMethod<I> {
    point: MethodPoint<I>,
    required: Vec<ComponentRef>,
}

/// 注入提供者
///
/// `I` 为实现类型，`D` 为绑定的声明类型。每次调用 `get` 都会依次执行
/// 构造器、字段赋值（从基础层到派生层）与注入方法。
pub struct InjectionProvider<I, D: ?Sized = I> {
    type_info: TypeInfo,
    constructor: ConstructorPoint<I>,
    constructor_refs: Vec<ComponentRef>,
    fields: Vec<AnalyzedField<I>>,
    methods: Vec<AnalyzedMethod<I>>,
    _declared: PhantomData<fn() -> Arc<D>>,
}

impl<I, D> InjectionProvider<I, D>
where
    I: Send + Sync + 'static,
    D: ?Sized + Send + Sync + 'static,
{
    /// 分析实现类型
    pub fn new() -> ComponentResult<Self>
    where
        I: Injectable,
    {
        Self::from_descriptor(I::descriptor())
    }

    /// 分析给定的注入描述符
    pub fn from_descriptor(descriptor: InjectionDescriptor<I>) -> ComponentResult<Self> {
        let type_info = descriptor.type_info;
        let illegal = |reason| ComponentError::illegal(type_info.name, reason);

        if descriptor.abstract_type {
            return Err(illegal(IllegalComponentReason::AbstractComponent));
        }

        let constructor = select_constructor(descriptor.constructors).map_err(illegal)?;

        let mut fields = Vec::new();
        let mut method_layers = Vec::with_capacity(descriptor.layers.len());
        for layer in descriptor.layers {
            fields.extend(layer.fields.into_iter());
            method_layers.push(layer.methods);
        }
        let methods = resolve_overrides(method_layers);

        if let Some(field) = fields.iter().find(|field| field.is_final) {
            return Err(illegal(IllegalComponentReason::FinalInjectField {
                field: field.param.name,
            }));
        }
        if let Some(method) = methods.iter().find(|method| method.type_parameters > 0) {
            return Err(illegal(IllegalComponentReason::GenericInjectMethod {
                method: method.name,
            }));
        }

        let constructor_refs = references(type_info, &constructor.params).map_err(illegal)?;
        let fields = fields
            .into_iter()
            .map(|point| {
                let reference = reference(type_info, &point.param)?;
                Ok(AnalyzedField { point, reference })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(illegal)?;
        let methods = methods
            .into_iter()
            .map(|point| {
                let required = references(type_info, &point.params)?;
                Ok(AnalyzedMethod { point, required })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(illegal)?;

        debug!(
            "分析组件: {}, 字段注入点 {} 个, 方法注入点 {} 个",
            type_info,
            fields.len(),
            methods.len()
        );

        Ok(Self {
            type_info,
            constructor,
            constructor_refs,
            fields,
            methods,
            _declared: PhantomData,
        })
    }

    /// 按分析结果创建实现类型的实例
    pub fn construct(&self, context: &dyn Context) -> DependencyResult<I> {
        let mut args = Args::new(self.resolve_all(context, &self.constructor_refs)?);
        let mut instance = (self.constructor.construct)(&mut args)?;

        for field in &self.fields {
            let resolved = self.resolve(context, &field.reference)?;
            (field.point.setter)(&mut instance, resolved)?;
        }

        for method in &self.methods {
            if let Some(invoke) = &method.point.invoke {
                let mut args = Args::new(self.resolve_all(context, &method.required)?);
                invoke(&mut instance, &mut args)?;
            }
        }

        Ok(instance)
    }

    /// 分析得到的注入点，按构造器、字段、方法的顺序排列
    pub fn injection_points(&self) -> Vec<InjectionPoint> {
        let constructor = InjectionPoint {
            kind: MemberKind::Constructor,
            required: self.constructor_refs.clone(),
        };
        let fields = self.fields.iter().map(|field| InjectionPoint {
            kind: MemberKind::Field(field.point.param.name),
            required: vec![field.reference.clone()],
        });
        let methods = self.methods.iter().map(|method| InjectionPoint {
            kind: MemberKind::Method(method.point.name),
            required: method.required.clone(),
        });

        std::iter::once(constructor).chain(fields).chain(methods).collect()
    }

    fn resolve(&self, context: &dyn Context, reference: &ComponentRef) -> DependencyResult<Resolved> {
        context
            .get(reference)?
            .ok_or_else(|| DependencyError::DependencyResolutionFailed {
                type_name: self.type_info.name.to_string(),
                message: format!("依赖 {} 无法解析", reference),
            })
    }

    fn resolve_all(
        &self,
        context: &dyn Context,
        references: &[ComponentRef],
    ) -> DependencyResult<Vec<Resolved>> {
        references
            .iter()
            .map(|reference| self.resolve(context, reference))
            .collect()
    }
}

impl<I, D> ComponentProvider for InjectionProvider<I, D>
where
    I: Implements<D>,
    D: ?Sized + Send + Sync + 'static,
{
    fn get(&self, context: &dyn Context) -> DependencyResult<Instance> {
        let instance = self.construct(context)?;
        Ok(into_instance(<I as Implements<D>>::upcast(Arc::new(instance))))
    }

    fn dependencies(&self) -> Vec<ComponentRef> {
        self.injection_points()
            .into_iter()
            .flat_map(|point| point.required)
            .collect()
    }
}

fn select_constructor<I>(
    constructors: Vec<ConstructorPoint<I>>,
) -> Result<ConstructorPoint<I>, IllegalComponentReason> {
    let (mut injected, plain): (Vec<_>, Vec<_>) =
        constructors.into_iter().partition(|constructor| constructor.inject);

    if injected.len() > 1 {
        return Err(IllegalComponentReason::AmbiguousConstructor);
    }
    if let Some(constructor) = injected.pop() {
        return Ok(constructor);
    }

    plain
        .into_iter()
        .find(|constructor| constructor.params.is_empty())
        .ok_or(IllegalComponentReason::NoUsableConstructor)
}

/// 方法覆写解析
///
/// 从最派生层向基础层遍历：被更派生层同签名方法覆写的注入方法一律丢弃，
/// 覆写者自身带注入标记时由它代替执行。结果按基础层优先排列。
fn resolve_overrides<I: 'static>(layers: Vec<Vec<MethodPoint<I>>>) -> Vec<MethodPoint<I>> {
    let mut overridden = HashSet::new();
    let mut collected = Vec::with_capacity(layers.len());

    for methods in layers.into_iter().rev() {
        let signatures: Vec<_> = methods.iter().map(MethodPoint::signature).collect();
        let kept: Vec<_> = methods
            .into_iter()
            .zip(signatures.iter())
            .filter(|(method, signature)| method.inject && !overridden.contains(*signature))
            .map(|(method, _)| method)
            .collect();
        overridden.extend(signatures);
        collected.push(kept);
    }

    collected.into_iter().rev().flatten().collect()
}

fn reference(owner: TypeInfo, param: &Param) -> Result<ComponentRef, IllegalComponentReason> {
    if param.qualifiers.len() > 1 {
        return Err(IllegalComponentReason::MultipleQualifiers {
            point: format!("{}::{}", owner.short_name(), param.name),
        });
    }
    Ok(param.component_ref(param.qualifiers.first().cloned()))
}

fn references(
    owner: TypeInfo,
    params: &[Param],
) -> Result<Vec<ComponentRef>, IllegalComponentReason> {
    params.iter().map(|param| reference(owner, param)).collect()
}
