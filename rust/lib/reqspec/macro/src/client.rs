//! `#[client]` macro expansion.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use reqspec_ir::DeclSet;
use reqspec_parser::{METHOD_ATTRS, PARAM_ATTRS, TYPE_ATTRS};
use reqspec_resolve::{MethodError, ResolveError};
use syn::{Attribute, FnArg, ItemTrait, TraitItem};

pub fn expand(attr: TokenStream, mut item: ItemTrait) -> syn::Result<TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[client] takes no arguments"));
    }

    let mut decl = reqspec_parser::parse_trait(&item)?;
    decl.is_client = true;
    let name = decl.name.clone();
    let specs = reqspec_resolve::resolve(&DeclSet::from_iter([decl]), &name)
        .into_result()
        .map_err(|err| to_syn_error(&item, &err))?;

    let json = serde_json::to_string(&specs)
        .map_err(|e| syn::Error::new_spanned(&item.ident, e))?;
    let const_name = format_ident!("__{}_REQUEST_SPECS", to_upper_snake(&name));
    let vis = &item.vis;
    let spec_const = quote! {
        #[doc(hidden)]
        #[allow(dead_code)]
        #vis const #const_name: &str = #json;
    };

    strip_helper_attrs(&mut item);
    Ok(quote! {
        #item
        #spec_const
    })
}

/// Every failure becomes one error, spanned at the offending method.
fn to_syn_error(item: &ItemTrait, err: &ResolveError) -> syn::Error {
    let mut errors = err
        .failures
        .iter()
        .map(|f| method_error(item, f))
        .chain(
            err.type_errors
                .iter()
                .map(|e| syn::Error::new_spanned(&item.ident, e)),
        );

    let Some(mut combined) = errors.next() else {
        return syn::Error::new_spanned(&item.ident, err);
    };
    for e in errors {
        combined.combine(e);
    }
    combined
}

fn method_error(item: &ItemTrait, failure: &MethodError) -> syn::Error {
    let ident = item.items.iter().find_map(|i| match i {
        TraitItem::Fn(f) if f.sig.ident == failure.method() => Some(&f.sig.ident),
        _ => None,
    });
    let msg = format!("`{}`: {}", failure.method(), failure.kind);
    match ident {
        Some(ident) => syn::Error::new_spanned(ident, msg),
        None => syn::Error::new_spanned(&item.ident, msg),
    }
}

fn strip_helper_attrs(item: &mut ItemTrait) {
    retain_foreign(&mut item.attrs, TYPE_ATTRS);
    for trait_item in item.items.iter_mut() {
        let TraitItem::Fn(f) = trait_item else {
            continue;
        };
        retain_foreign(&mut f.attrs, METHOD_ATTRS);
        for input in f.sig.inputs.iter_mut() {
            if let FnArg::Typed(pt) = input {
                retain_foreign(&mut pt.attrs, PARAM_ATTRS);
            }
        }
    }
}

fn retain_foreign(attrs: &mut Vec<Attribute>, helpers: &[&str]) {
    attrs.retain(|a| !helpers.iter().any(|h| a.path().is_ident(h)));
}

/// `UserApi` → `USER_API`, `HTTPClient` → `HTTP_CLIENT`.
fn to_upper_snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn upper_snake() {
        assert_eq!(to_upper_snake("Users"), "USERS");
        assert_eq!(to_upper_snake("UserApi"), "USER_API");
        assert_eq!(to_upper_snake("HTTPClient"), "HTTP_CLIENT");
        assert_eq!(to_upper_snake("V2Api"), "V2_API");
    }

    #[test]
    fn expansion_strips_helpers_and_embeds_specs() {
        let item: ItemTrait = parse_quote! {
            #[header("Accept", "application/json")]
            #[allow(dead_code)]
            pub trait Users {
                #[get("/users/:id")]
                #[doc = "Find one user."]
                async fn find(&self, #[param("id")] user: u64);
            }
        };
        let out = expand(TokenStream::new(), item).unwrap().to_string();

        assert!(out.contains("__USERS_REQUEST_SPECS"));
        assert!(out.contains("allow"));
        assert!(out.contains("doc"));
        assert!(!out.contains("# [get"));
        assert!(!out.contains("# [header"));
        assert!(!out.contains("# [param"));
    }

    #[test]
    fn failures_are_compile_errors() {
        let item: ItemTrait = parse_quote! {
            trait Broken {
                async fn no_route(&self);
                #[get("/items/:id")]
                async fn unbound(&self);
                #[get("/sync")]
                fn blocking(&self);
            }
        };
        let err = expand(TokenStream::new(), item).unwrap_err();
        let messages: Vec<String> = err.into_iter().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].starts_with("`no_route`"));
        assert!(messages[1].contains(":id"));
        assert!(messages[2].contains("async"));
    }

    #[test]
    fn type_errors_without_method_failures_still_fail() {
        let item: ItemTrait = parse_quote!(trait Empty {});
        let err = ResolveError {
            root: "Empty".into(),
            failures: Vec::new(),
            type_errors: vec![reqspec_resolve::TypeError::UnknownType("Empty".into())],
        };
        let messages: Vec<String> = to_syn_error(&item, &err)
            .into_iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(messages, vec!["type `Empty` is not declared"]);
    }

    #[test]
    fn arguments_rejected() {
        let item: ItemTrait = parse_quote!(trait Empty {});
        assert!(expand(quote!(strict), item).is_err());
    }
}
