//! 宏工具函数

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, LitStr, Member, Path, Result};

/// 检查是否带有指定名称的属性
pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// 注入参数名称，元组结构体使用字段序号
pub fn member_name(member: &Member) -> String {
    match member {
        Member::Named(ident) => ident.to_string(),
        Member::Unnamed(index) => index.index.to_string(),
    }
}

/// 解析字段上的限定符
///
/// `#[named("value")]` 生成命名限定符，`#[qualifier(Marker)]` 生成标记限定符。
/// 多个限定符原样保留，由注入分析器在绑定时拒绝。
pub fn parse_qualifiers(attrs: &[Attribute]) -> Result<Vec<TokenStream>> {
    let mut qualifiers = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("named") {
            let value: LitStr = attr.parse_args()?;
            qualifiers.push(quote! { ::di_abstractions::Qualifier::named(#value) });
        } else if attr.path().is_ident("qualifier") {
            let marker: Path = attr.parse_args()?;
            qualifiers.push(quote! { ::di_abstractions::Qualifier::of::<#marker>() });
        }
    }

    Ok(qualifiers)
}
