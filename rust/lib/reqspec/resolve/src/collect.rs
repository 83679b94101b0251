//! Build fragments from raw declarations.
//!
//! Validation happens here, one method at a time, in this order:
//! async capability, route presence, template binding. The first failure
//! is the one reported.

use reqspec_ir::{
    compile, AttributeElement, BodyElement, ClassFragment, Fragment, MethodDecl, MethodFragment,
    ParamRef, QueryElement, RouteDecl, TypeDecl,
};
use tracing::warn;

use crate::error::MethodErrorKind;
use crate::params::resolve_param;

/// Class-level fragment of a type: its own headers and timeout.
pub fn class_fragment(ty: &TypeDecl) -> Fragment {
    Fragment::Class(ClassFragment {
        headers: ty.headers.clone(),
        timeout: ty.timeout,
    })
}

/// Method-level fragment of one method.
pub fn method_fragment(method: &MethodDecl) -> Result<MethodFragment, MethodErrorKind> {
    if !method.is_async {
        return Err(MethodErrorKind::NonAsynchronousTarget);
    }

    let route = select_route(method).ok_or(MethodErrorKind::MissingRouteAnnotation)?;
    let url = compile(&route.template, |name| resolve_param(method, name))
        .map_err(|e| MethodErrorKind::UnboundPlaceholder(e.name))?;

    Ok(MethodFragment {
        url,
        method: route.method.clone(),
        body: body(method),
        headers: method.headers.clone(),
        query: query(method),
        attributes: attributes(method),
        timeout: method.timeout,
    })
}

/// The route with the best rank; ties go to the first declared.
fn select_route(method: &MethodDecl) -> Option<&RouteDecl> {
    let route = method.routes.iter().min_by_key(|r| r.rank())?;
    if method.routes.len() > 1 {
        warn!(
            method = %method.name,
            chosen = %route.method,
            ignored = method.routes.len() - 1,
            "multiple route annotations, using the highest-precedence one"
        );
    }
    Some(route)
}

fn body(method: &MethodDecl) -> Option<BodyElement> {
    let mut marked = method
        .params
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.body.as_ref().map(|b| (i, p, b)));

    let (index, param, decl) = marked.next()?;
    let extra = marked.count();
    if extra > 0 {
        warn!(
            method = %method.name,
            body = %param.name,
            ignored = extra,
            "multiple #[body] parameters, using the first"
        );
    }
    Some(BodyElement::new(
        ParamRef::new(index, param.name.clone()),
        decl.content_type.clone(),
    ))
}

/// Method-scope constants first, then parameter bindings in parameter order.
fn query(method: &MethodDecl) -> Vec<QueryElement> {
    let bound = method.params.iter().enumerate().filter_map(|(i, p)| {
        p.query.as_ref().map(|binding| {
            QueryElement::variable(binding.resolve(&p.name), ParamRef::new(i, p.name.clone()))
        })
    });
    method.queries.iter().cloned().chain(bound).collect()
}

fn attributes(method: &MethodDecl) -> Vec<AttributeElement> {
    method
        .params
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            p.attr.as_ref().map(|binding| {
                AttributeElement::new(binding.resolve(&p.name), ParamRef::new(i, p.name.clone()))
            })
        })
        .collect()
}
