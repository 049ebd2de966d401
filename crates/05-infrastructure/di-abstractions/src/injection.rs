//! 注入描述符
//!
//! 组件实现通过声明式的描述符暴露自己的注入点：构造器、字段与方法。
//! 描述符在绑定时被分析一次，分析器负责执行构造器唯一性、final 字段、
//! 方法覆写等规则。
//!
//! 类层级以 [`MemberLayer`] 表示，按从最基础到最派生的顺序排列。

use crate::context::{Referable, Resolved};
use infrastructure_common::{
    ComponentRef, DependencyError, DependencyResult, Qualifier, ScopeKind, TypeInfo,
};
use std::fmt;
use std::sync::Arc;

/// 可注入组件 trait
///
/// 可手写实现，也可以通过 `#[derive(Injectable)]` 生成。
pub trait Injectable: Sized + Send + Sync + 'static {
    /// 获取注入描述符
    fn descriptor() -> InjectionDescriptor<Self>;
}

/// 构造函数类型
pub type ConstructFn<T> = Arc<dyn Fn(&mut Args) -> DependencyResult<T> + Send + Sync>;

/// 字段赋值函数类型
pub type FieldSetter<T> = Arc<dyn Fn(&mut T, Resolved) -> DependencyResult<()> + Send + Sync>;

/// 方法调用函数类型
pub type MethodFn<T> = Arc<dyn Fn(&mut T, &mut Args) -> DependencyResult<()> + Send + Sync>;

/// 注入参数
#[derive(Clone)]
pub struct Param {
    /// 参数名称
    pub name: &'static str,
    /// 消费者声明的类型，用于方法签名比较
    pub value_type: TypeInfo,
    /// 参数上的限定符
    pub qualifiers: Vec<Qualifier>,
    reference: fn(Option<Qualifier>) -> ComponentRef,
}

impl Param {
    /// 按消费者类型创建参数
    pub fn of<R: Referable>(name: &'static str) -> Self {
        Self {
            name,
            value_type: TypeInfo::of::<R>(),
            qualifiers: Vec::new(),
            reference: R::component_ref,
        }
    }

    /// 添加限定符
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    /// 构造参数对应的组件引用
    pub fn component_ref(&self, qualifier: Option<Qualifier>) -> ComponentRef {
        (self.reference)(qualifier)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("qualifiers", &self.qualifiers)
            .finish()
    }
}

/// 构造器
pub struct ConstructorPoint<T> {
    /// 是否标记为注入构造器
    pub inject: bool,
    /// 参数列表
    pub params: Vec<Param>,
    /// 构造函数
    pub construct: ConstructFn<T>,
}

impl<T: 'static> ConstructorPoint<T> {
    /// 注入构造器
    pub fn inject<F>(params: Vec<Param>, construct: F) -> Self
    where
        F: Fn(&mut Args) -> DependencyResult<T> + Send + Sync + 'static,
    {
        Self {
            inject: true,
            params,
            construct: Arc::new(construct),
        }
    }

    /// 普通构造器，只有无参时才会被用作后备
    pub fn plain<F>(params: Vec<Param>, construct: F) -> Self
    where
        F: Fn(&mut Args) -> DependencyResult<T> + Send + Sync + 'static,
    {
        Self {
            inject: false,
            params,
            construct: Arc::new(construct),
        }
    }

    /// 无参构造器
    pub fn no_args<F>(construct: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::plain(Vec::new(), move |_| Ok(construct()))
    }
}

/// 字段注入点
pub struct FieldPoint<T> {
    /// 字段声明
    pub param: Param,
    /// 是否为构造后不可变的字段
    pub is_final: bool,
    /// 赋值函数
    pub setter: FieldSetter<T>,
}

impl<T: 'static> FieldPoint<T> {
    /// 注入字段
    pub fn inject<R, F>(name: &'static str, setter: F) -> Self
    where
        R: Referable,
        F: Fn(&mut T, R) + Send + Sync + 'static,
    {
        Self {
            param: Param::of::<R>(name),
            is_final: false,
            setter: Arc::new(move |target: &mut T, resolved: Resolved| {
                let value = R::from_resolved(resolved).ok_or(DependencyError::TypeMismatch {
                    expected: std::any::type_name::<R>(),
                })?;
                setter(target, value);
                Ok(())
            }),
        }
    }

    /// 添加限定符
    pub fn qualified(mut self, qualifier: Qualifier) -> Self {
        self.param = self.param.qualified(qualifier);
        self
    }

    /// 标记为 final 字段
    pub fn final_field(mut self) -> Self {
        self.is_final = true;
        self
    }
}

/// 方法
///
/// 非注入方法只需要签名，用于判断是否覆写了基础层的注入方法。
pub struct MethodPoint<T> {
    /// 方法名称
    pub name: &'static str,
    /// 是否标记为注入方法
    pub inject: bool,
    /// 类型参数数量
    pub type_parameters: usize,
    /// 参数列表
    pub params: Vec<Param>,
    /// 调用函数
    pub invoke: Option<MethodFn<T>>,
}

impl<T: 'static> MethodPoint<T> {
    /// 注入方法
    pub fn inject<F>(name: &'static str, params: Vec<Param>, invoke: F) -> Self
    where
        F: Fn(&mut T, &mut Args) -> DependencyResult<()> + Send + Sync + 'static,
    {
        Self {
            name,
            inject: true,
            type_parameters: 0,
            params,
            invoke: Some(Arc::new(invoke)),
        }
    }

    /// 非注入方法
    pub fn plain(name: &'static str, params: Vec<Param>) -> Self {
        Self {
            name,
            inject: false,
            type_parameters: 0,
            params,
            invoke: None,
        }
    }

    /// 声明类型参数
    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    /// 方法签名：名称与参数类型
    pub fn signature(&self) -> (&'static str, Vec<TypeInfo>) {
        (
            self.name,
            self.params.iter().map(|param| param.value_type).collect(),
        )
    }
}

/// 类层级
pub struct MemberLayer<T> {
    /// 层级名称
    pub name: &'static str,
    /// 字段
    pub fields: Vec<FieldPoint<T>>,
    /// 方法
    pub methods: Vec<MethodPoint<T>>,
}

impl<T> MemberLayer<T> {
    /// 创建新的类层级
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// 添加字段
    pub fn with_field(mut self, field: FieldPoint<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// 添加方法
    pub fn with_method(mut self, method: MethodPoint<T>) -> Self {
        self.methods.push(method);
        self
    }
}

/// 注入描述符
pub struct InjectionDescriptor<T> {
    /// 实现类型
    pub type_info: TypeInfo,
    /// 是否为抽象类型
    pub abstract_type: bool,
    /// 构造器
    pub constructors: Vec<ConstructorPoint<T>>,
    /// 类层级，从最基础到最派生
    pub layers: Vec<MemberLayer<T>>,
    /// 实现类型上声明的作用域
    pub scopes: Vec<ScopeKind>,
}

impl<T: 'static> InjectionDescriptor<T> {
    /// 创建新的注入描述符
    pub fn new() -> Self {
        Self {
            type_info: TypeInfo::of::<T>(),
            abstract_type: false,
            constructors: Vec::new(),
            layers: Vec::new(),
            scopes: Vec::new(),
        }
    }

    /// 标记为抽象类型
    pub fn mark_abstract(mut self) -> Self {
        self.abstract_type = true;
        self
    }

    /// 添加构造器
    pub fn with_constructor(mut self, constructor: ConstructorPoint<T>) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// 添加类层级，后添加的层级更派生
    pub fn with_layer(mut self, layer: MemberLayer<T>) -> Self {
        self.layers.push(layer);
        self
    }

    /// 声明作用域
    pub fn with_scope(mut self, scope: ScopeKind) -> Self {
        self.scopes.push(scope);
        self
    }
}

impl<T: 'static> Default for InjectionDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 注入点类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// 构造器
    Constructor,
    /// 字段
    Field(&'static str),
    /// 方法
    Method(&'static str),
}

/// 分析后的注入点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    /// 注入点类型
    pub kind: MemberKind,
    /// 需要的组件引用
    pub required: Vec<ComponentRef>,
}

/// 注入参数值
///
/// 按参数声明顺序依次取出解析结果。
pub struct Args {
    values: std::vec::IntoIter<Resolved>,
}

impl Args {
    /// 创建参数值列表
    pub fn new(values: Vec<Resolved>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// 取出下一个参数
    pub fn take<R: Referable>(&mut self) -> DependencyResult<R> {
        let resolved = self
            .values
            .next()
            .ok_or_else(|| DependencyError::DependencyResolutionFailed {
                type_name: std::any::type_name::<R>().to_string(),
                message: "注入参数数量不足".to_string(),
            })?;
        R::from_resolved(resolved).ok_or(DependencyError::TypeMismatch {
            expected: std::any::type_name::<R>(),
        })
    }

    /// 剩余参数数量
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
