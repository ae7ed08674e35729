//! 宏工具函数

use syn::{
    Attribute, Expr, FnArg, GenericArgument, Ident, Lit, LitStr, Meta, PathArguments, Result,
    ReturnType, Signature, Type,
};

/// 构造函数的返回形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorReturn {
    /// 直接返回 `Self`
    Plain,
    /// 返回 `Result<Self, E>`
    Fallible,
}

/// 从 `Arc<T>` 中提取 `T`
pub fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    first_type_argument(&segment.arguments)
}

/// 类型是否为 trait 对象，例如 `dyn Repository`
pub fn is_trait_object(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) => true,
        Type::Paren(paren) => is_trait_object(&paren.elem),
        Type::Group(group) => is_trait_object(&group.elem),
        _ => false,
    }
}

/// 判断返回类型是否为组件本身
pub fn constructor_return(output: &ReturnType, self_ident: &Ident) -> Option<ConstructorReturn> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    if names_self(ty, self_ident) {
        return Some(ConstructorReturn::Plain);
    }

    let Type::Path(type_path) = ty.as_ref() else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Result" {
        return None;
    }
    first_type_argument(&segment.arguments)
        .filter(|ok| names_self(ok, self_ident))
        .map(|_| ConstructorReturn::Fallible)
}

/// 函数签名是否有 `self` 接收者
pub fn has_receiver(signature: &Signature) -> bool {
    signature
        .inputs
        .iter()
        .any(|input| matches!(input, FnArg::Receiver(_)))
}

/// 返回类型是否为 `Result<..>`
pub fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(type_path) = ty.as_ref() else {
        return false;
    };
    type_path
        .path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Result")
}

/// 是否带有指定名称的属性
pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// 移除指定名称的属性
pub fn strip_attribute(attrs: &mut Vec<Attribute>, name: &str) {
    attrs.retain(|attr| !attr.path().is_ident(name));
}

/// 解析 `#[qualifier("tag")]` 或 `#[qualifier = "tag"]`
pub fn qualifier_value(attrs: &[Attribute]) -> Result<Option<String>> {
    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident("qualifier")) else {
        return Ok(None);
    };

    match &attr.meta {
        Meta::List(_) => attr.parse_args::<LitStr>().map(|lit| Some(lit.value())),
        Meta::NameValue(name_value) => match &name_value.value {
            Expr::Lit(expr_lit) => match &expr_lit.lit {
                Lit::Str(lit_str) => Ok(Some(lit_str.value())),
                _ => Err(syn::Error::new_spanned(attr, "限定符必须是字符串")),
            },
            _ => Err(syn::Error::new_spanned(attr, "限定符必须是字符串")),
        },
        Meta::Path(_) => Err(syn::Error::new_spanned(
            attr,
            "限定符缺少标签，应写成 #[qualifier(\"tag\")]",
        )),
    }
}

fn names_self(ty: &Type, self_ident: &Ident) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    type_path.qself.is_none()
        && type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Self" || segment.ident == *self_ident)
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    let PathArguments::AngleBracketed(angle) = arguments else {
        return None;
    };
    angle.args.iter().find_map(|argument| match argument {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
