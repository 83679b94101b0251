//! Declaration IR: raw metadata read off traits, methods and parameters.
//!
//! This is what a metadata provider hands to the resolver. Nothing here is
//! merged or validated yet; header and query strings are already split into
//! elements, but route templates are still text.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{HeaderElement, HttpMethod, QueryElement, TimeoutElement};

/// One route annotation on a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecl {
    pub method: HttpMethod,
    pub template: String,
    /// Declared through a verb shorthand (`#[get]`) rather than the
    /// generic `#[request]`.
    pub shorthand: bool,
}

impl RouteDecl {
    pub fn shorthand(method: HttpMethod, template: impl Into<String>) -> Self {
        Self {
            method,
            template: template.into(),
            shorthand: true,
        }
    }

    pub fn generic(method: impl AsRef<str>, template: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::parse(method.as_ref()),
            template: template.into(),
            shorthand: false,
        }
    }

    /// Selection rank when a method carries several routes: shorthands in
    /// GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS order, then generic.
    pub fn rank(&self) -> u8 {
        if !self.shorthand {
            return 7;
        }
        match self.method {
            HttpMethod::Get => 0,
            HttpMethod::Post => 1,
            HttpMethod::Put => 2,
            HttpMethod::Patch => 3,
            HttpMethod::Delete => 4,
            HttpMethod::Head => 5,
            HttpMethod::Options => 6,
            HttpMethod::Custom(_) => 7,
        }
    }
}

/// An optional explicit name; falls back to the parameter's own name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NameBinding {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// The explicit name unless it is missing or empty.
    pub fn resolve<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => fallback,
        }
    }
}

/// Body marker on a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A method parameter (receiver excluded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    /// Type as written, whitespace removed.
    pub ty: String,
    /// Placeholder name override (`#[param("...")]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<NameBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<NameBinding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyDecl>,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            rename: None,
            query: None,
            attr: None,
            body: None,
        }
    }
}

/// A method declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    /// `async fn`, or returns a future.
    pub is_async: bool,
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Every route annotation, in source order.
    #[serde(default)]
    pub routes: Vec<RouteDecl>,
    #[serde(default)]
    pub headers: Vec<HeaderElement>,
    /// Method-scope query constants, in source order.
    #[serde(default)]
    pub queries: Vec<QueryElement>,
    #[serde(default)]
    pub timeout: TimeoutElement,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_async: true,
            params: Vec::new(),
            routes: Vec::new(),
            headers: Vec::new(),
            queries: Vec::new(),
            timeout: TimeoutElement::EMPTY,
        }
    }

    pub fn signature(&self, owner: &str) -> MethodSignature {
        MethodSignature {
            owner: owner.to_string(),
            method: self.name.clone(),
            params: self.params.iter().map(|p| p.ty.clone()).collect(),
        }
    }
}

/// A trait (or any interface-like type) with its own metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Marked for generation (`#[client]`).
    pub is_client: bool,
    #[serde(default)]
    pub headers: Vec<HeaderElement>,
    #[serde(default)]
    pub timeout: TimeoutElement,
    /// Directly extended types, in declared order.
    #[serde(default)]
    pub extends: Vec<String>,
    /// Methods declared on this type (not inherited).
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_client: false,
            headers: Vec::new(),
            timeout: TimeoutElement::EMPTY,
            extends: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Method identity: declaring type, name and parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSignature {
    pub owner: String,
    pub method: String,
    #[serde(default)]
    pub params: Vec<String>,
}

impl MethodSignature {
    pub fn new(owner: impl Into<String>, method: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            owner: owner.into(),
            method: method.into(),
            params,
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}({})", self.owner, self.method, self.params.join(", "))
    }
}

// ── Provider ────────────────────────────────────────────────────────

/// Source of declarations for the resolver.
pub trait MetadataProvider {
    fn type_decl(&self, name: &str) -> Option<&TypeDecl>;

    /// All declarations, in a stable order.
    fn type_decls(&self) -> Vec<&TypeDecl>;

    /// Declarations marked for generation.
    fn client_types(&self) -> Vec<&TypeDecl> {
        self.type_decls().into_iter().filter(|t| t.is_client).collect()
    }
}

/// In-memory provider, insertion-ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclSet {
    types: Vec<TypeDecl>,
}

impl DeclSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration. A declaration with the same name is replaced in
    /// place and returned.
    pub fn insert(&mut self, decl: TypeDecl) -> Option<TypeDecl> {
        match self.types.iter_mut().find(|t| t.name == decl.name) {
            Some(existing) => Some(std::mem::replace(existing, decl)),
            None => {
                self.types.push(decl);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDecl> for DeclSet {
    fn from_iter<I: IntoIterator<Item = TypeDecl>>(iter: I) -> Self {
        let mut set = DeclSet::new();
        for decl in iter {
            set.insert(decl);
        }
        set
    }
}

impl MetadataProvider for DeclSet {
    fn type_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }

    fn type_decls(&self) -> Vec<&TypeDecl> {
        self.types.iter().collect()
    }
}
