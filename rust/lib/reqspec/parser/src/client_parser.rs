//! Parser for `#[client]` trait definitions.
//!
//! Reads a trait and produces a `TypeDecl` with raw per-declaration
//! metadata. Nothing is merged or validated here beyond the syntax of the
//! helper attributes themselves.
//!
//! Entries of `#[headers(..)]` and `#[queries(..)]` must contain their
//! delimiter (`:` and `=`). An entry without one is a compile error at the
//! literal; it is never read as an empty name/value pair.
//!
//! Example:
//! ```ignore
//! #[client]
//! #[header("Accept", "application/json")]
//! #[timeout(connect = 1000)]
//! pub trait Users: Paged {
//!     #[get("/users/:id")]
//!     async fn find(&self, id: u64) -> User;
//!
//!     #[post("/users")]
//!     #[headers("X-Trace: on")]
//!     async fn create(&self, #[body("application/json")] user: NewUser) -> User;
//! }
//! ```

use reqspec_ir::{
    BodyDecl, HeaderElement, HttpMethod, MethodDecl, NameBinding, ParamDecl, QueryElement,
    RouteDecl, TimeoutElement, TypeDecl,
};
use syn::{
    Attribute, FnArg, GenericArgument, Item, ItemTrait, Pat, PathArguments, ReturnType,
    Signature, TraitItem, TraitItemFn, Type, TypeParamBound,
};

use crate::util::{self, AttrArgs};

/// Helper attributes read off a trait.
pub const TYPE_ATTRS: &[&str] = &["header", "headers", "timeout"];

/// Helper attributes read off a trait method.
pub const METHOD_ATTRS: &[&str] = &[
    "request", "get", "post", "put", "patch", "delete", "head", "options", "header", "headers",
    "query", "queries", "timeout",
];

/// Helper attributes read off a method parameter.
pub const PARAM_ATTRS: &[&str] = &["param", "query", "attr", "body"];

/// Parse a trait into its declaration.
///
/// `is_client` is set when the trait still carries `#[client]`; the
/// attribute macro sets it itself since it consumes that attribute.
pub fn parse_trait(item: &ItemTrait) -> syn::Result<TypeDecl> {
    let mut decl = TypeDecl::new(item.ident.to_string());
    decl.is_client = item.attrs.iter().any(|a| util::attr_is(a, "client"));

    for attr in &item.attrs {
        if util::attr_is(attr, "header") {
            decl.headers.push(parse_header(attr)?);
        } else if util::attr_is(attr, "headers") {
            decl.headers.extend(parse_header_list(attr)?);
        } else if util::attr_is(attr, "timeout") {
            decl.timeout = decl.timeout.merge(&parse_timeout(attr)?);
        }
    }

    for bound in &item.supertraits {
        if let TypeParamBound::Trait(t) = bound {
            if let Some(seg) = t.path.segments.last() {
                decl.extends.push(seg.ident.to_string());
            }
        }
    }

    for trait_item in &item.items {
        if let TraitItem::Fn(f) = trait_item {
            decl.methods.push(parse_method(f)?);
        }
    }
    Ok(decl)
}

/// Parse every trait in a file, including traits in inline modules.
pub fn parse_file(file: &syn::File) -> syn::Result<Vec<TypeDecl>> {
    let mut decls = Vec::new();
    collect_items(&file.items, &mut decls)?;
    Ok(decls)
}

fn collect_items(items: &[Item], decls: &mut Vec<TypeDecl>) -> syn::Result<()> {
    for item in items {
        match item {
            Item::Trait(t) => decls.push(parse_trait(t)?),
            Item::Mod(m) => {
                if let Some((_, content)) = &m.content {
                    collect_items(content, decls)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parse one trait method.
pub fn parse_method(f: &TraitItemFn) -> syn::Result<MethodDecl> {
    let mut method = MethodDecl::new(f.sig.ident.to_string());
    method.is_async = is_async_signature(&f.sig);

    for attr in &f.attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };
        let name = ident.to_string();
        match name.as_str() {
            "request" => method.routes.push(parse_generic_route(attr)?),
            "header" => method.headers.push(parse_header(attr)?),
            "headers" => method.headers.extend(parse_header_list(attr)?),
            "query" => method.queries.push(parse_query(attr)?),
            "queries" => method.queries.extend(parse_query_list(attr)?),
            "timeout" => method.timeout = method.timeout.merge(&parse_timeout(attr)?),
            other => {
                if let Some(verb) = HttpMethod::from_shorthand(other) {
                    method.routes.push(parse_shorthand_route(attr, verb)?);
                }
            }
        }
    }

    for input in &f.sig.inputs {
        let FnArg::Typed(pt) = input else {
            continue;
        };
        let Pat::Ident(pat) = pt.pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                &pt.pat,
                "client method parameters must be plain identifiers",
            ));
        };
        let mut param = ParamDecl::new(pat.ident.to_string(), util::type_to_string(&pt.ty));
        parse_param_attrs(&pt.attrs, &mut param)?;
        method.params.push(param);
    }
    Ok(method)
}

fn parse_param_attrs(attrs: &[Attribute], param: &mut ParamDecl) -> syn::Result<()> {
    for attr in attrs {
        if util::attr_is(attr, "param") {
            let args = AttrArgs::from_attr(attr)?;
            args.expect_keys(&["name"])?;
            let name = args.require_string(attr, 0, "name", "#[param(\"name\")]")?;
            param.rename = Some(name.value());
        } else if util::attr_is(attr, "query") {
            param.query = Some(parse_name_binding(attr)?);
        } else if util::attr_is(attr, "attr") {
            param.attr = Some(parse_name_binding(attr)?);
        } else if util::attr_is(attr, "body") {
            let args = AttrArgs::from_attr(attr)?;
            args.expect_keys(&["content_type"])?;
            param.body = Some(BodyDecl {
                content_type: args.string(0, "content_type")?.map(|s| s.value()),
            });
        }
    }
    Ok(())
}

fn parse_name_binding(attr: &Attribute) -> syn::Result<NameBinding> {
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&["name"])?;
    Ok(NameBinding {
        name: args.string(0, "name")?.map(|s| s.value()),
    })
}

fn parse_generic_route(attr: &Attribute) -> syn::Result<RouteDecl> {
    const USAGE: &str = "#[request(\"VERB\", \"/url\")]";
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&["method", "url"])?;
    let verb = args.require_string(attr, 0, "method", USAGE)?;
    let url = args.require_string(attr, 1, "url", USAGE)?;
    if verb.value().is_empty() {
        return Err(syn::Error::new_spanned(verb, "HTTP method must not be empty"));
    }
    Ok(RouteDecl::generic(verb.value(), url.value()))
}

fn parse_shorthand_route(attr: &Attribute, verb: HttpMethod) -> syn::Result<RouteDecl> {
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&["url"])?;
    let usage = format!("#[{}(\"/url\")]", verb.as_str().to_ascii_lowercase());
    let url = args.require_string(attr, 0, "url", &usage)?;
    Ok(RouteDecl::shorthand(verb, url.value()))
}

fn parse_header(attr: &Attribute) -> syn::Result<HeaderElement> {
    const USAGE: &str = "#[header(\"Name\", \"Value\")]";
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&["name", "value"])?;
    let name = args.require_string(attr, 0, "name", USAGE)?;
    let value = args.require_string(attr, 1, "value", USAGE)?;
    Ok(HeaderElement::new(name.value(), value.value()))
}

/// `#[headers("Name: Value", ..)]`. An entry with no `:` is rejected.
fn parse_header_list(attr: &Attribute) -> syn::Result<Vec<HeaderElement>> {
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&[])?;
    args.positional
        .iter()
        .map(|lit| HeaderElement::parse(&lit.value()).map_err(|e| syn::Error::new_spanned(lit, e)))
        .collect()
}

fn parse_query(attr: &Attribute) -> syn::Result<QueryElement> {
    const USAGE: &str = "#[query(\"name\", \"value\")] on a method";
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&["name", "value"])?;
    let name = args.require_string(attr, 0, "name", USAGE)?;
    let value = args.require_string(attr, 1, "value", USAGE)?;
    Ok(QueryElement::constant(name.value(), value.value()))
}

/// `#[queries("name=value", ..)]`. An entry with no `=` is rejected.
fn parse_query_list(attr: &Attribute) -> syn::Result<Vec<QueryElement>> {
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&[])?;
    args.positional
        .iter()
        .map(|lit| {
            QueryElement::parse_constant(&lit.value()).map_err(|e| syn::Error::new_spanned(lit, e))
        })
        .collect()
}

fn parse_timeout(attr: &Attribute) -> syn::Result<TimeoutElement> {
    let args = AttrArgs::from_attr(attr)?;
    args.expect_keys(&["connect", "request", "socket"])?;
    Ok(TimeoutElement::from_millis(
        args.int("connect")?.unwrap_or(-1),
        args.int("request")?.unwrap_or(-1),
        args.int("socket")?.unwrap_or(-1),
    ))
}

/// `async fn`, or a return type that is a future.
pub fn is_async_signature(sig: &Signature) -> bool {
    if sig.asyncness.is_some() {
        return true;
    }
    match &sig.output {
        ReturnType::Type(_, ty) => is_future_type(ty),
        ReturnType::Default => false,
    }
}

/// `impl Future`, `dyn Future`, `Pin<Box<dyn Future>>`, `BoxFuture<..>`.
fn is_future_type(ty: &Type) -> bool {
    match ty {
        Type::ImplTrait(t) => has_future_bound(t.bounds.iter()),
        Type::TraitObject(t) => has_future_bound(t.bounds.iter()),
        Type::Paren(p) => is_future_type(&p.elem),
        Type::Path(p) => {
            let Some(seg) = p.path.segments.last() else {
                return false;
            };
            match seg.ident.to_string().as_str() {
                "BoxFuture" | "LocalBoxFuture" => true,
                "Pin" | "Box" => match &seg.arguments {
                    PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| {
                        matches!(arg, GenericArgument::Type(inner) if is_future_type(inner))
                    }),
                    _ => false,
                },
                _ => false,
            }
        }
        _ => false,
    }
}

fn has_future_bound<'a>(mut bounds: impl Iterator<Item = &'a TypeParamBound>) -> bool {
    bounds.any(|b| match b {
        TypeParamBound::Trait(t) => t
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "Future"),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqspec_ir::ParamRef;
    use syn::parse_quote;

    fn parse(item: ItemTrait) -> TypeDecl {
        parse_trait(&item).expect("failed to parse trait")
    }

    #[test]
    fn type_level_metadata() {
        let t = parse(parse_quote! {
            #[client]
            #[header("Accept", "application/json")]
            #[headers("X-A: 1", "X-B:2")]
            #[timeout(connect = 1000, socket = -1)]
            pub trait Users: Paged + Send + std::fmt::Debug {}
        });

        assert_eq!(t.name, "Users");
        assert!(t.is_client);
        assert_eq!(
            t.headers,
            vec![
                HeaderElement::new("Accept", "application/json"),
                HeaderElement::new("X-A", "1"),
                HeaderElement::new("X-B", "2"),
            ]
        );
        assert_eq!(t.timeout, TimeoutElement::from_millis(1000, -1, -1));
        assert_eq!(t.extends, vec!["Paged", "Send", "Debug"]);
    }

    #[test]
    fn routes_in_source_order() {
        let t = parse(parse_quote! {
            trait Foo {
                #[request("CUSTOM", "/custom")]
                #[post("/post")]
                #[request(method = "GET", url = "/named")]
                async fn bar(&self);
            }
        });
        let m = &t.methods[0];
        assert!(!t.is_client);
        assert_eq!(
            m.routes,
            vec![
                RouteDecl::generic("CUSTOM", "/custom"),
                RouteDecl::shorthand(HttpMethod::Post, "/post"),
                RouteDecl::generic("GET", "/named"),
            ]
        );
    }

    #[test]
    fn method_headers_and_queries() {
        let t = parse(parse_quote! {
            trait Foo {
                #[get("/bar")]
                #[header(name = "X-Api", value = "2")]
                #[queries("v = 2", "tag=a")]
                #[query("tag", "b")]
                async fn bar(&self);
            }
        });
        let m = &t.methods[0];
        assert_eq!(m.headers, vec![HeaderElement::new("X-Api", "2")]);
        assert_eq!(
            m.queries,
            vec![
                QueryElement::constant("v", "2"),
                QueryElement::constant("tag", "a"),
                QueryElement::constant("tag", "b"),
            ]
        );
    }

    #[test]
    fn param_metadata() {
        let t = parse(parse_quote! {
            trait Foo {
                #[put("/items/:key")]
                async fn update(
                    &self,
                    #[param("key")] id: u64,
                    #[query] search: Option<String>,
                    #[query("order")] sort: String,
                    #[attr(name = "trace")] t: TraceId,
                    #[body("application/json")] item: Item,
                );
            }
        });
        let m = &t.methods[0];
        let names: Vec<_> = m.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["id", "search", "sort", "t", "item"]);

        assert_eq!(m.params[0].rename.as_deref(), Some("key"));
        assert_eq!(m.params[0].ty, "u64");
        assert_eq!(m.params[1].query, Some(NameBinding::default()));
        assert_eq!(m.params[1].ty, "Option<String>");
        assert_eq!(m.params[2].query, Some(NameBinding::named("order")));
        assert_eq!(m.params[3].attr, Some(NameBinding::named("trace")));
        assert_eq!(
            m.params[4].body.as_ref().unwrap().content_type.as_deref(),
            Some("application/json")
        );
    }

    #[test]
    fn parsed_method_resolves_placeholder_through_override() {
        let t = parse(parse_quote! {
            trait Foo {
                #[get("/items/:key")]
                async fn find(&self, #[param("key")] id: u64);
            }
        });
        let m = &t.methods[0];
        let url = reqspec_ir::compile(&m.routes[0].template, |name| {
            m.params
                .iter()
                .position(|p| p.rename.as_deref() == Some(name))
                .map(|i| ParamRef::new(i, m.params[i].name.clone()))
        })
        .unwrap();
        assert_eq!(url.len(), 2);
    }

    #[test]
    fn timeouts_fold_with_override() {
        let t = parse(parse_quote! {
            trait Foo {
                #[get("/bar")]
                #[timeout(connect = 10, request = 20)]
                #[timeout(request = 30)]
                async fn bar(&self);
            }
        });
        assert_eq!(
            t.methods[0].timeout,
            TimeoutElement::from_millis(10, 30, -1)
        );
    }

    #[test]
    fn async_detection() {
        let t = parse(parse_quote! {
            trait Foo {
                async fn a(&self);
                fn b(&self) -> impl Future<Output = u8> + Send;
                fn c(&self) -> Pin<Box<dyn Future<Output = u8> + Send>>;
                fn d(&self) -> BoxFuture<'static, u8>;
                fn e(&self) -> u8;
                fn f(&self);
            }
        });
        let flags: Vec<_> = t.methods.iter().map(|m| m.is_async).collect();
        assert_eq!(flags, vec![true, true, true, true, false, false]);
    }

    #[test]
    fn header_without_colon_is_error() {
        let item: ItemTrait = parse_quote! {
            #[headers("NoColon")]
            trait Foo {}
        };
        let err = parse_trait(&item).unwrap_err();
        assert!(err.to_string().contains("Name: Value"));
    }

    #[test]
    fn query_without_equals_is_error() {
        let item: ItemTrait = parse_quote! {
            trait Foo {
                #[get("/bar")]
                #[queries("novalue")]
                async fn bar(&self);
            }
        };
        let err = parse_trait(&item).unwrap_err();
        assert!(err.to_string().contains("name=value"));
    }

    #[test]
    fn delimited_entries_may_be_empty() {
        let t = parse(parse_quote! {
            #[headers("X-Empty:")]
            trait Foo {
                #[get("/bar")]
                #[queries("flag=")]
                async fn bar(&self);
            }
        });
        assert_eq!(t.headers, vec![HeaderElement::new("X-Empty", "")]);
        assert_eq!(t.methods[0].queries, vec![QueryElement::constant("flag", "")]);
    }

    #[test]
    fn shorthand_without_url_is_error() {
        let item: ItemTrait = parse_quote! {
            trait Foo {
                #[get]
                async fn bar(&self);
            }
        };
        let err = parse_trait(&item).unwrap_err();
        assert!(err.to_string().contains("#[get(\"/url\")]"));
    }

    #[test]
    fn destructured_param_is_error() {
        let item: ItemTrait = parse_quote! {
            trait Foo {
                #[get("/bar")]
                async fn bar(&self, (a, b): (u8, u8));
            }
        };
        assert!(parse_trait(&item).is_err());
    }

    #[test]
    fn file_with_inline_modules() {
        let file: syn::File = parse_quote! {
            #[client]
            trait Root: api::Base {}

            mod api {
                trait Base {
                    #[get("/ping")]
                    async fn ping(&self);
                }
            }

            struct NotATrait;
        };
        let decls = parse_file(&file).unwrap();
        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Base"]);
        assert_eq!(decls[0].extends, vec!["Base"]);
    }
}
