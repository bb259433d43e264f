//! Procedural macros for agent tool definitions.
//!
//! `#[tool]` reads a function's doc comment and signature at compile time and
//! emits a companion `<name>_tool()` constructor returning an
//! `agent_tools::ToolBinding`. The binding carries the derived descriptor and
//! an adapter that binds named JSON arguments to the typed parameters.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Expr, FnArg, GenericArgument, ItemFn, Lit, LitStr, Meta, Pat, PathArguments, ReturnType, Type,
    parse_macro_input,
};

/// Marks a free function as an agent tool.
///
/// Options: `#[tool(name = "custom_name")]` overrides the registered name.
/// Parameters may carry `#[default]` to fall back to `Default::default()`
/// when the model omits them; `Option<T>` parameters are optional as well.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut name_override: Option<LitStr> = None;
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            name_override = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unsupported tool option; expected `name = \"...\"`"))
        }
    });
    parse_macro_input!(attr with parser);

    let func = parse_macro_input!(item as ItemFn);
    expand(func, name_override)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct ToolParam {
    extract: TokenStream2,
    argument: TokenStream2,
    descriptor: TokenStream2,
}

fn expand(mut func: ItemFn, name_override: Option<LitStr>) -> syn::Result<TokenStream2> {
    if !func.sig.generics.params.is_empty() {
        return Err(syn::Error::new(
            func.sig.generics.span(),
            "#[tool] functions cannot be generic",
        ));
    }

    let fn_ident = func.sig.ident.clone();
    let tool_name = name_override.map_or_else(|| fn_ident.unraw().to_string(), |lit| lit.value());
    let binding_fn = format_ident!("{}_tool", fn_ident.unraw());
    let doc = collect_doc(&func);

    let mut params = Vec::new();
    for input in &mut func.sig.inputs {
        let span = input.span();
        let FnArg::Typed(pat_type) = input else {
            return Err(syn::Error::new(span, "#[tool] functions cannot take `self`"));
        };

        let before = pat_type.attrs.len();
        pat_type.attrs.retain(|attr| !attr.path().is_ident("default"));
        let has_default_attr = pat_type.attrs.len() != before;

        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(syn::Error::new(
                pat_type.pat.span(),
                "#[tool] parameters must be plain identifiers",
            ));
        };
        params.push(tool_param(
            &pat_ident.ident.unraw().to_string(),
            &pat_type.ty,
            has_default_attr,
        ));
    }

    let vis = &func.vis;
    let doc_call = doc.map(|doc| quote! { .doc(#doc) });
    let descriptors = params.iter().map(|param| &param.descriptor);
    let extracts = params.iter().map(|param| &param.extract);
    let arguments = params.iter().map(|param| &param.argument);
    let binding_doc = format!("Tool binding for [`{fn_ident}`], registered as `{tool_name}`.");
    // Named after the binding so it cannot shadow the annotated function.
    let adapter = format_ident!("__{}_execute", binding_fn);

    let mut call = quote! { #fn_ident(#(#arguments),*) };
    if func.sig.asyncness.is_some() {
        call = quote! { #call.await };
    }

    let body = if returns_result(&func.sig.output) {
        quote! {
            match #call {
                ::std::result::Result::Ok(value) => ::agent_tools::encode_output(value),
                ::std::result::Result::Err(err) => ::std::result::Result::Err(
                    ::agent_tools::ToolError::execution(::std::string::ToString::to_string(&err)),
                ),
            }
        }
    } else {
        quote! { ::agent_tools::encode_output(#call) }
    };

    Ok(quote! {
        #func

        #[doc = #binding_doc]
        #vis fn #binding_fn() -> ::agent_tools::ToolBinding {
            fn #adapter(arguments: ::agent_tools::ToolArguments) -> ::agent_tools::ToolFuture {
                ::std::boxed::Box::pin(async move {
                    #[allow(unused_mut)]
                    let mut args = ::agent_tools::ArgumentBag::new(arguments);
                    #(#extracts)*
                    args.finish()?;
                    #body
                })
            }

            let descriptor = ::agent_tools::DescriptorBuilder::new(#tool_name)
                #doc_call
                #(.parameter(#descriptors))*
                .build();
            ::agent_tools::ToolBinding::new(descriptor, #adapter)
        }

        ::agent_tools::inventory::submit! {
            ::agent_tools::ToolRegistration::new(#binding_fn)
        }
    })
}

fn tool_param(name: &str, ty: &Type, has_default_attr: bool) -> ToolParam {
    let binding = format_ident!("arg_{}", name);

    let option_inner = option_inner(ty);
    let has_default = has_default_attr || option_inner.is_some();

    let (owned, argument) = match (ty, option_inner) {
        (Type::Reference(reference), _) => {
            let owned = owned_type(&reference.elem);
            let argument = if reference.mutability.is_some() {
                quote! { &mut #binding }
            } else {
                quote! { &#binding }
            };
            (owned, argument)
        }
        (_, Some(Type::Reference(reference))) if reference.mutability.is_none() => {
            let inner = owned_type(&reference.elem);
            let argument = if derefs_to_borrowed(&reference.elem) {
                quote! { #binding.as_deref() }
            } else {
                quote! { #binding.as_ref() }
            };
            (quote! { ::std::option::Option<#inner> }, argument)
        }
        (other, _) => (quote! { #other }, quote! { #binding }),
    };
    let mutability = match ty {
        Type::Reference(reference) if reference.mutability.is_some() => quote! { mut },
        _ => TokenStream2::new(),
    };

    let extract = if has_default_attr {
        quote! { let #mutability #binding: #owned = args.or_default::<#owned>(#name)?; }
    } else if option_inner.is_some() {
        quote! { let #mutability #binding: #owned = args.optional(#name)?; }
    } else {
        quote! { let #mutability #binding: #owned = args.required::<#owned>(#name)?; }
    };

    let constructor = if has_default {
        quote! { ::agent_tools::Parameter::optional(#name) }
    } else {
        quote! { ::agent_tools::Parameter::required(#name) }
    };
    let descriptor = match type_tag(ty) {
        Some(tag) => {
            let tag = format_ident!("{}", tag);
            quote! { #constructor.with_type(::agent_tools::TypeTag::#tag) }
        }
        None => constructor,
    };

    ToolParam {
        extract,
        argument,
        descriptor,
    }
}

/// Joins `///` lines, dropping the single space rustdoc keeps after `///`.
fn collect_doc(func: &ItemFn) -> Option<String> {
    let lines: Vec<String> = func
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(text) => Some(text.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_owned).unwrap_or(line))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Owned counterpart used to deserialize a borrowed parameter.
fn owned_type(ty: &Type) -> TokenStream2 {
    match ty {
        Type::Path(path) if path.qself.is_none() && path.path.is_ident("str") => {
            quote! { ::std::string::String }
        }
        Type::Slice(slice) => {
            let elem = &slice.elem;
            quote! { ::std::vec::Vec<#elem> }
        }
        other => quote! { #other },
    }
}

/// `str` and slices are borrowed through `as_deref` on their owned forms.
fn derefs_to_borrowed(ty: &Type) -> bool {
    matches!(ty, Type::Slice(_))
        || matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("str"))
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path.path.segments.last(),
        _ => None,
    }
}

fn generic_types(segment: &syn::PathSegment) -> Vec<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let segment = last_segment(ty)?;
    if segment.ident != "Option" {
        return None;
    }
    match generic_types(segment).as_slice() {
        [inner] => Some(*inner),
        _ => None,
    }
}

fn returns_result(output: &ReturnType) -> bool {
    match output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => last_segment(ty).is_some_and(|segment| segment.ident == "Result"),
    }
}

/// Maps a Rust type onto a `TypeTag` variant name. `None` leaves the
/// parameter untyped.
fn type_tag(ty: &Type) -> Option<&'static str> {
    match ty {
        Type::Reference(reference) => type_tag(&reference.elem),
        Type::Paren(paren) => type_tag(&paren.elem),
        Type::Group(group) => type_tag(&group.elem),
        Type::Slice(_) | Type::Array(_) => Some("Array"),
        Type::Path(_) => {
            let segment = last_segment(ty)?;
            let ident = segment.ident.to_string();
            match ident.as_str() {
                "Option" | "Box" | "Arc" | "Rc" | "Cow" => {
                    generic_types(segment).last().and_then(|inner| type_tag(inner))
                }
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" => Some("Integer"),
                "f32" | "f64" => Some("Number"),
                "bool" => Some("Boolean"),
                "String" | "str" | "char" | "PathBuf" => Some("String"),
                "Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "LinkedList" => Some("Array"),
                "HashMap" | "BTreeMap" | "Map" => Some("Object"),
                _ => None,
            }
        }
        _ => None,
    }
}
