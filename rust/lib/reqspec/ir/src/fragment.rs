//! Configuration fragments and the merge algebra.
//!
//! `left.merge(right)` is not commutative:
//!
//! | field                          | rule                                      |
//! |--------------------------------|-------------------------------------------|
//! | url, method, body              | from the method-level operand (right wins)|
//! | timeout                        | per sub-field, right wins if set          |
//! | headers, attributes            | `left ++ right`, dedup by name, first wins|
//! | query                          | `left ++ right`, no dedup                 |
//!
//! A body content type always yields a leading `Content-Type` header, so it
//! beats any declared `Content-Type` regardless of scope.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::template::TemplatePart;
use crate::types::{
    AttributeElement, BodyElement, HeaderElement, HttpMethod, QueryElement, TimeoutElement,
};

/// Metadata attached to a type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassFragment {
    #[serde(default)]
    pub headers: Vec<HeaderElement>,
    #[serde(default)]
    pub timeout: TimeoutElement,
}

/// Metadata attached to one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodFragment {
    pub url: Vec<TemplatePart>,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyElement>,
    #[serde(default)]
    pub headers: Vec<HeaderElement>,
    #[serde(default)]
    pub query: Vec<QueryElement>,
    #[serde(default)]
    pub attributes: Vec<AttributeElement>,
    #[serde(default)]
    pub timeout: TimeoutElement,
}

impl MethodFragment {
    /// A fragment with a route and nothing else.
    pub fn new(method: HttpMethod, url: Vec<TemplatePart>) -> Self {
        Self {
            url,
            method,
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
            attributes: Vec::new(),
            timeout: TimeoutElement::EMPTY,
        }
    }

    /// Headers as they take effect: the body's `Content-Type` first, then
    /// the declared headers, deduplicated by name.
    pub fn effective_headers(&self) -> Vec<HeaderElement> {
        merge_headers(self.body.as_ref(), &[], &self.headers)
    }

    /// Attributes deduplicated by name, first wins.
    pub fn effective_attributes(&self) -> Vec<AttributeElement> {
        dedup_by_name(self.attributes.iter().cloned(), |a| &a.name)
    }
}

/// A partial configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "lowercase")]
pub enum Fragment {
    /// Identity element of [`Fragment::merge`]. A method-level operand still
    /// comes back with its effective headers and attributes.
    #[default]
    Empty,
    Class(ClassFragment),
    Method(MethodFragment),
}

impl Fragment {
    pub fn headers(&self) -> &[HeaderElement] {
        match self {
            Fragment::Empty => &[],
            Fragment::Class(c) => &c.headers,
            Fragment::Method(m) => &m.headers,
        }
    }

    pub fn timeout(&self) -> TimeoutElement {
        match self {
            Fragment::Empty => TimeoutElement::EMPTY,
            Fragment::Class(c) => c.timeout,
            Fragment::Method(m) => m.timeout,
        }
    }

    pub fn query(&self) -> &[QueryElement] {
        match self {
            Fragment::Method(m) => &m.query,
            Fragment::Empty | Fragment::Class(_) => &[],
        }
    }

    pub fn attributes(&self) -> &[AttributeElement] {
        match self {
            Fragment::Method(m) => &m.attributes,
            Fragment::Empty | Fragment::Class(_) => &[],
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Fragment::Method(_))
    }

    /// `self ⊕ right`.
    pub fn merge(&self, right: &Fragment) -> Fragment {
        match (self, right) {
            (Fragment::Empty, Fragment::Method(m)) | (Fragment::Method(m), Fragment::Empty) => {
                Fragment::Method(Fragment::Empty.apply(m))
            }
            (Fragment::Empty, r) => r.clone(),
            (l, Fragment::Empty) => l.clone(),
            (l, Fragment::Method(r)) => Fragment::Method(l.apply(r)),
            (Fragment::Class(l), Fragment::Class(r)) => Fragment::Class(ClassFragment {
                headers: merge_headers(None, &l.headers, &r.headers),
                timeout: l.timeout.merge(&r.timeout),
            }),
            (Fragment::Method(l), Fragment::Class(r)) => Fragment::Method(MethodFragment {
                url: l.url.clone(),
                method: l.method.clone(),
                body: l.body.clone(),
                headers: merge_headers(l.body.as_ref(), &l.headers, &r.headers),
                query: l.query.clone(),
                attributes: l.effective_attributes(),
                timeout: l.timeout.merge(&r.timeout),
            }),
        }
    }

    /// `self ⊕ method`, typed: the result is always method-level.
    pub fn apply(&self, method: &MethodFragment) -> MethodFragment {
        let mut query = self.query().to_vec();
        query.extend(method.query.iter().cloned());

        MethodFragment {
            url: method.url.clone(),
            method: method.method.clone(),
            body: method.body.clone(),
            headers: merge_headers(method.body.as_ref(), self.headers(), &method.headers),
            query,
            attributes: dedup_by_name(
                self.attributes().iter().chain(&method.attributes).cloned(),
                |a| &a.name,
            ),
            timeout: self.timeout().merge(&method.timeout),
        }
    }
}

/// `[content-type] ++ left ++ right`, dedup by name, first wins.
fn merge_headers(
    body: Option<&BodyElement>,
    left: &[HeaderElement],
    right: &[HeaderElement],
) -> Vec<HeaderElement> {
    let synthetic = body.and_then(BodyElement::content_type_header);
    dedup_by_name(
        synthetic.into_iter().chain(left.iter().cloned()).chain(right.iter().cloned()),
        |h| &h.name,
    )
}

fn dedup_by_name<T, I, F>(items: I, name: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(name(item).to_string()))
        .collect()
}
