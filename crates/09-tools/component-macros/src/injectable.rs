//! 可注入组件派生宏实现

use crate::utils::{has_attribute, member_name, parse_qualifiers};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, Data, DeriveInput, Error, Ident, Index, Member, Path,
    Result, Token, Type,
};

/// 组件参数
///
/// `#[component(singleton, scope = Marker, implements = dyn Trait)]`
#[derive(Default)]
pub struct ComponentArgs {
    /// 作用域表达式
    pub scopes: Vec<TokenStream>,
    /// 可以作为哪些声明类型绑定
    pub implements: Vec<Type>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ComponentArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "singleton" {
                args.scopes
                    .push(quote! { ::di_abstractions::ScopeKind::singleton() });
            } else if key == "pooled" {
                args.scopes
                    .push(quote! { ::di_abstractions::ScopeKind::pooled() });
            } else if key == "scope" {
                input.parse::<Token![=]>()?;
                let marker: Path = input.parse()?;
                args.scopes
                    .push(quote! { ::di_abstractions::ScopeKind::of::<#marker>() });
            } else if key == "implements" {
                input.parse::<Token![=]>()?;
                args.implements.push(input.parse()?);
            } else {
                return Err(Error::new_spanned(
                    &key,
                    format!("未知的组件参数: {}", key),
                ));
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

fn component_args(input: &DeriveInput) -> Result<ComponentArgs> {
    let mut merged = ComponentArgs::default();
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("component")) {
        let args = attr.parse_args::<ComponentArgs>()?;
        merged.scopes.extend(args.scopes);
        merged.implements.extend(args.implements);
    }
    Ok(merged)
}

/// 实现 #[derive(Injectable)] 宏
///
/// 标记 `#[inject]` 的字段成为注入构造器的参数，其余字段使用 `Default` 初始化。
pub fn derive_injectable_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(Error::new_spanned(
                struct_name,
                "#[derive(Injectable)] 只支持结构体",
            ))
        }
    };

    let args = component_args(&input)?;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut params = Vec::new();
    let mut initializers = Vec::new();
    for (index, field) in data.fields.iter().enumerate() {
        let member = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(index)),
        };
        let qualifiers = parse_qualifiers(&field.attrs)?;

        if has_attribute(&field.attrs, "inject") {
            let ty = &field.ty;
            let name = member_name(&member);
            params.push(quote! {
                ::di_abstractions::Param::of::<#ty>(#name) #(.qualified(#qualifiers))*
            });
            initializers.push(quote! { #member: args.take()? });
        } else if !qualifiers.is_empty() {
            return Err(Error::new_spanned(field, "限定符只能用于 #[inject] 字段"));
        } else {
            initializers.push(quote! { #member: ::std::default::Default::default() });
        }
    }

    let constructor = if params.is_empty() {
        quote! {
            ::di_abstractions::ConstructorPoint::no_args(|| Self { #(#initializers),* })
        }
    } else {
        quote! {
            ::di_abstractions::ConstructorPoint::inject(
                ::std::vec![#(#params),*],
                |args: &mut ::di_abstractions::Args| {
                    ::std::result::Result::Ok(Self { #(#initializers),* })
                },
            )
        }
    };
    let scopes = &args.scopes;

    let implements: Vec<_> = args
        .implements
        .iter()
        .map(|declared| {
            quote! {
                impl #impl_generics ::di_abstractions::Implements<#declared> for #struct_name #ty_generics #where_clause {
                    fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<#declared> {
                        self
                    }
                }
            }
        })
        .collect();

    Ok(quote! {
        impl #impl_generics ::di_abstractions::Injectable for #struct_name #ty_generics #where_clause {
            fn descriptor() -> ::di_abstractions::InjectionDescriptor<Self> {
                ::di_abstractions::InjectionDescriptor::new()
                    .with_constructor(#constructor)
                    #(.with_scope(#scopes))*
            }
        }

        #(#implements)*
    })
}
