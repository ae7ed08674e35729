//! 组件注册宏实现

use crate::utils::{
    arc_inner, constructor_return, has_attribute, has_receiver, is_trait_object, qualifier_value,
    returns_result, strip_attribute, ConstructorReturn,
};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{
    parenthesized, parse::Parse, parse::ParseStream, punctuated::Punctuated, FnArg, Ident,
    ImplItem, ImplItemFn, ItemImpl, LitStr, Result, Token, Type,
};

/// 组件配置参数
#[derive(Default)]
pub struct ComponentArgs {
    /// 组件限定符
    pub qualifier: Option<String>,
    /// 组件实现的接口
    pub provides: Vec<Type>,
}

impl Parse for ComponentArgs {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut args = ComponentArgs::default();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "qualifier" {
                input.parse::<Token![=]>()?;
                let value: LitStr = input.parse()?;
                args.qualifier = Some(value.value());
            } else if key == "provides" {
                let content;
                parenthesized!(content in input);
                let interfaces = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                for interface in interfaces {
                    if !is_trait_object(&interface) {
                        return Err(syn::Error::new_spanned(
                            interface,
                            "provides 只接受 trait 对象，例如 dyn Repository",
                        ));
                    }
                    args.provides.push(interface);
                }
            } else {
                return Err(syn::Error::new(key.span(), format!("未知的组件参数: {key}")));
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

/// 构造函数参数
struct ConstructorParam {
    ty: Type,
    interface: bool,
    qualifier: Option<String>,
}

/// 构造函数信息
struct ConstructorInfo {
    ident: Ident,
    injection: bool,
    returns: ConstructorReturn,
    params: Vec<ConstructorParam>,
}

/// post-construct 方法信息
struct PostConstructInfo {
    ident: Ident,
    fallible: bool,
}

/// 实现 #[component] 宏
pub fn component_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = match syn::parse::<ComponentArgs>(args) {
        Ok(args) => args,
        Err(e) => return e.to_compile_error().into(),
    };
    let item = match syn::parse::<ItemImpl>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(args, item) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// 展开组件定义和启动注册代码
pub fn expand(args: ComponentArgs, mut item: ItemImpl) -> Result<TokenStream2> {
    if item.trait_.is_some() {
        return Err(syn::Error::new_spanned(
            &item.self_ty,
            "#[component] 只能用于固有 impl 块",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&item.generics, "不支持泛型组件"));
    }

    let self_ty = item.self_ty.as_ref().clone();
    let self_ident = self_type_ident(&self_ty)?;

    let mut constructors = Vec::new();
    let mut hooks = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            if let Some(constructor) = inspect_constructor(method, &self_ident)? {
                constructors.push(constructor);
            }
            if let Some(hook) = inspect_post_construct(method)? {
                hooks.push(hook);
            }
            strip_helper_attributes(method);
        }
    }

    if constructors.is_empty() {
        return Err(syn::Error::new_spanned(
            &self_ty,
            "组件至少需要一个构造函数：无 self 参数、参数均为 Arc<T>、返回 Self 或 Result<Self, E>",
        ));
    }

    let qualifier_call = args.qualifier.as_ref().map(|tag| quote! { .qualifier(#tag) });
    let provides_calls = args.provides.iter().map(|interface| {
        quote! {
            .provides::<#interface, _>(
                |bean: ::std::sync::Arc<#self_ty>| -> ::std::sync::Arc<#interface> { bean }
            )
        }
    });
    let constructor_calls = constructors
        .iter()
        .map(|constructor| constructor_call(&self_ty, constructor));
    let hook_calls = hooks.iter().map(|hook| post_construct_call(&self_ty, hook));

    let registration_fn_name = Ident::new(
        &format!(
            "__register_component_{}",
            self_ident.to_string().to_lowercase()
        ),
        Span::call_site(),
    );

    Ok(quote! {
        #item

        impl ::di_abstractions::ComponentDefinitionProvider for #self_ty {
            fn component_definition() -> ::di_abstractions::ComponentDefinition {
                ::di_abstractions::ComponentDefinition::builder::<#self_ty>()
                    #qualifier_call
                    #(#provides_calls)*
                    #(#constructor_calls)*
                    #(#hook_calls)*
                    .build()
            }
        }

        // 使用 ctor 在程序启动时自动注册组件
        #[ctor::ctor]
        fn #registration_fn_name() {
            ::di_abstractions::submit_component(
                <#self_ty as ::di_abstractions::ComponentDefinitionProvider>::component_definition,
            );
        }
    })
}

fn self_type_ident(self_ty: &Type) -> Result<Ident> {
    match self_ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.clone())
            .ok_or_else(|| syn::Error::new_spanned(self_ty, "无法识别组件类型")),
        _ => Err(syn::Error::new_spanned(self_ty, "组件类型必须是具名类型")),
    }
}

fn inspect_constructor(method: &ImplItemFn, self_ident: &Ident) -> Result<Option<ConstructorInfo>> {
    let injection = has_attribute(&method.attrs, "autowired");
    let signature = &method.sig;
    let returns = constructor_return(&signature.output, self_ident);

    let candidate = !has_receiver(signature)
        && signature.generics.params.is_empty()
        && signature.asyncness.is_none()
        && returns.is_some();

    let mut params = Vec::new();
    if candidate {
        for input in &signature.inputs {
            let FnArg::Typed(pat_type) = input else {
                continue;
            };
            let Some(inner) = arc_inner(&pat_type.ty) else {
                if injection {
                    return Err(syn::Error::new_spanned(
                        &pat_type.ty,
                        "#[autowired] 构造函数的参数必须是 Arc<T> 或 Arc<dyn Trait>",
                    ));
                }
                return Ok(None);
            };
            params.push(ConstructorParam {
                ty: inner.clone(),
                interface: is_trait_object(inner),
                qualifier: qualifier_value(&pat_type.attrs)?,
            });
        }
    }

    match returns {
        Some(returns) if candidate => Ok(Some(ConstructorInfo {
            ident: signature.ident.clone(),
            injection,
            returns,
            params,
        })),
        _ if injection => Err(syn::Error::new_spanned(
            &signature.ident,
            "#[autowired] 只能用于无 self 参数、返回 Self 或 Result<Self, E> 的非泛型同步函数",
        )),
        _ => Ok(None),
    }
}

fn inspect_post_construct(method: &ImplItemFn) -> Result<Option<PostConstructInfo>> {
    if !has_attribute(&method.attrs, "post_construct") {
        return Ok(None);
    }

    let signature = &method.sig;
    let valid = signature.inputs.len() == 1
        && matches!(signature.inputs.first(), Some(FnArg::Receiver(receiver))
            if receiver.reference.is_some() && receiver.mutability.is_none())
        && signature.generics.params.is_empty()
        && signature.asyncness.is_none();
    if !valid {
        return Err(syn::Error::new_spanned(
            &signature.ident,
            "#[post_construct] 方法必须只有 &self 参数",
        ));
    }

    Ok(Some(PostConstructInfo {
        ident: signature.ident.clone(),
        fallible: returns_result(&signature.output),
    }))
}

fn strip_helper_attributes(method: &mut ImplItemFn) {
    strip_attribute(&mut method.attrs, "autowired");
    strip_attribute(&mut method.attrs, "post_construct");
    for input in &mut method.sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            strip_attribute(&mut pat_type.attrs, "qualifier");
        }
    }
}

fn constructor_call(self_ty: &Type, constructor: &ConstructorInfo) -> TokenStream2 {
    let ident = &constructor.ident;
    let name = ident.to_string();
    let method = if constructor.injection {
        quote! { injection_constructor }
    } else {
        quote! { constructor }
    };

    let dependencies = constructor.params.iter().map(|param| {
        let ty = &param.ty;
        let base = if param.interface {
            quote! { ::di_abstractions::Dependency::interface::<#ty>() }
        } else {
            quote! { ::di_abstractions::Dependency::concrete::<#ty>() }
        };
        match &param.qualifier {
            Some(tag) => quote! { #base.qualified(#tag) },
            None => base,
        }
    });
    let arguments = constructor.params.iter().enumerate().map(|(index, param)| {
        let ty = &param.ty;
        quote! { args.get::<#ty>(#index)? }
    });
    let call = quote! { <#self_ty>::#ident(#(#arguments),*) };
    let body = match constructor.returns {
        ConstructorReturn::Plain => quote! { ::std::result::Result::Ok(#call) },
        ConstructorReturn::Fallible => quote! { ::std::result::Result::Ok(#call?) },
    };

    quote! {
        .#method(
            #name,
            ::std::vec![#(#dependencies),*],
            |args: &::di_abstractions::ResolvedArgs| -> ::std::result::Result<
                #self_ty,
                ::std::boxed::Box<dyn ::std::error::Error + ::std::marker::Send + ::std::marker::Sync>,
            > {
                #body
            },
        )
    }
}

fn post_construct_call(self_ty: &Type, hook: &PostConstructInfo) -> TokenStream2 {
    let ident = &hook.ident;
    let name = ident.to_string();
    let invoke = if hook.fallible {
        quote! { component.#ident()?; }
    } else {
        quote! { component.#ident(); }
    };

    quote! {
        .post_construct(
            #name,
            |component: &#self_ty| -> ::std::result::Result<
                (),
                ::std::boxed::Box<dyn ::std::error::Error + ::std::marker::Send + ::std::marker::Sync>,
            > {
                #invoke
                ::std::result::Result::Ok(())
            },
        )
    }
}
