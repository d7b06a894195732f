use proc_macro::TokenStream;
use quote::quote;
use syn::{
    FnArg, ItemFn, Lit, Meta, ReturnType, Token, Type, TypePath, parse::Parser,
    punctuated::Punctuated, spanned::Spanned,
};

/// Registers a function as a script builtin.
///
/// The function must have the signature `fn(Vec<i64>) -> BuiltinResult`. It is
/// submitted under its lowerCamelCase name unless `#[builtin(name = "...")]`
/// overrides it. The first paragraph of its doc comment becomes the description
/// shown by `methods`.
#[proc_macro_attribute]
pub fn builtin(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = syn::parse_macro_input!(item as ItemFn);
    let fn_ident = &input_fn.sig.ident;

    if let Err(err) = validate_signature(&input_fn) {
        return err.to_compile_error().into();
    }

    let name_override = match parse_name_override(attr) {
        Ok(value) => value,
        Err(err) => return err.to_compile_error().into(),
    };

    let derived_name = to_lower_camel(&fn_ident.to_string());
    let name_literal = name_override.unwrap_or(derived_name);
    let description = doc_summary(&input_fn);

    let expanded = quote! {
        #input_fn
        minikt::submit_builtin!(#name_literal, #description, #fn_ident);
    };

    expanded.into()
}

fn parse_name_override(attr: TokenStream) -> syn::Result<Option<String>> {
    if attr.is_empty() {
        return Ok(None);
    }

    let parser = Punctuated::<Meta, Token![,]>::parse_terminated;
    let metas = parser.parse(attr)?;
    let mut name_value = None;

    for meta in metas {
        let nv = match meta {
            Meta::NameValue(nv) => nv,
            other => {
                return Err(syn::Error::new(other.span(), "expected `name = \"...\"`"));
            }
        };
        if !nv.path.is_ident("name") {
            return Err(syn::Error::new(nv.path.span(), "unknown builtin option"));
        }
        match nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: Lit::Str(lit_str),
                ..
            }) => {
                name_value = Some(lit_str.value());
            }
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "expected string literal for name",
                ));
            }
        }
    }

    Ok(name_value)
}

fn doc_summary(input_fn: &ItemFn) -> String {
    input_fn
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(syn::MetaNameValue {
                value:
                    syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(doc), ..
                    }),
                ..
            }) => Some(doc.value().trim().to_string()),
            _ => None,
        })
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn validate_signature(input_fn: &ItemFn) -> syn::Result<()> {
    let inputs = &input_fn.sig.inputs;
    if inputs.len() != 1 {
        return Err(syn::Error::new(
            input_fn.sig.inputs.span(),
            "expected signature: fn(Vec<i64>) -> BuiltinResult",
        ));
    }

    let Some(FnArg::Typed(arg)) = inputs.first() else {
        return Err(syn::Error::new(
            input_fn.sig.inputs.span(),
            "expected a typed argument",
        ));
    };

    if !is_vec_of_integers(&arg.ty) {
        return Err(syn::Error::new(
            arg.ty.span(),
            "expected argument type Vec<i64>",
        ));
    }

    match &input_fn.sig.output {
        ReturnType::Type(_, ty) if is_builtin_result(ty) => Ok(()),
        _ => Err(syn::Error::new(
            input_fn.sig.output.span(),
            "expected return type BuiltinResult",
        )),
    }
}

fn last_segment_is(ty: &Type, ident: &str) -> bool {
    let Type::Path(TypePath { path, .. }) = ty else {
        return false;
    };

    path.segments
        .last()
        .map(|seg| seg.ident == ident)
        .unwrap_or(false)
}

fn is_vec_of_integers(ty: &Type) -> bool {
    let Type::Path(TypePath { path, .. }) = ty else {
        return false;
    };

    let Some(seg) = path.segments.last() else {
        return false;
    };

    if seg.ident != "Vec" {
        return false;
    }

    let syn::PathArguments::AngleBracketed(args) = &seg.arguments else {
        return false;
    };

    let Some(syn::GenericArgument::Type(inner_ty)) = args.args.first() else {
        return false;
    };

    last_segment_is(inner_ty, "i64")
}

fn is_builtin_result(ty: &Type) -> bool {
    last_segment_is(ty, "BuiltinResult")
}

fn to_lower_camel(name: &str) -> String {
    let mut parts = name.split('_');
    let Some(first) = parts.next() else {
        return String::new();
    };

    let mut result = String::from(first);
    for part in parts {
        let mut chars = part.chars();
        if let Some(first_char) = chars.next() {
            result.push(first_char.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }

    result
}
