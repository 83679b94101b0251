//! Request configuration elements.
//!
//! Every element is immutable once built. Elements that reference a method
//! parameter carry a [`ParamRef`] that was resolved while reading the
//! declaration, so an emitter never has to look the parameter up again.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── HTTP verbs ──────────────────────────────────────────────────────

/// HTTP verb of a request.
///
/// The seven standard verbs have their own variants; anything else given
/// through the generic `#[request]` route is kept verbatim as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Custom(String),
}

impl HttpMethod {
    /// Parse a verb token. Matching is case-sensitive: `"GET"` is
    /// [`HttpMethod::Get`], `"get"` is a custom verb.
    pub fn parse(token: &str) -> Self {
        match token {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            other => HttpMethod::Custom(other.to_string()),
        }
    }

    /// Map a shorthand attribute name (`get`, `post`, ...) to its verb.
    pub fn from_shorthand(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Custom(token) => token,
        }
    }

    /// True for the seven verbs that have a shorthand attribute.
    pub fn is_standard(&self) -> bool {
        !matches!(self, HttpMethod::Custom(_))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for HttpMethod {
    fn from(token: String) -> Self {
        HttpMethod::parse(&token)
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Custom(token) => token,
            standard => standard.as_str().to_string(),
        }
    }
}

// ── Parameter references ────────────────────────────────────────────

/// A resolved reference to one method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamRef {
    /// Position in the parameter list, receiver excluded.
    pub index: usize,
    /// The parameter's own identifier.
    pub name: String,
}

impl ParamRef {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

// ── Elements ────────────────────────────────────────────────────────

/// Parse failure for the string forms of headers and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementParseError {
    #[error("header `{0}` must be written as `Name: Value`")]
    MissingColon(String),

    #[error("query `{0}` must be written as `name=value`")]
    MissingEquals(String),
}

/// A literal request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderElement {
    pub name: String,
    pub value: String,
}

impl HeaderElement {
    pub const CONTENT_TYPE: &'static str = "Content-Type";

    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parse `"Name: Value"`, splitting at the first `:` and trimming both
    /// sides. A string without `:` is an error, not an empty header.
    pub fn parse(header: &str) -> Result<Self, ElementParseError> {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| ElementParseError::MissingColon(header.to_string()))?;
        Ok(Self::new(name.trim(), value.trim()))
    }

    /// The header synthesized from a body's content type.
    pub fn content_type(value: impl Into<String>) -> Self {
        Self::new(Self::CONTENT_TYPE, value)
    }
}

/// A query-string item. Duplicate names are legal and all are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryElement {
    /// Literal `name=value`.
    Constant { name: String, value: String },
    /// Value taken from a parameter at call time.
    Variable { name: String, param: ParamRef },
}

impl QueryElement {
    pub fn constant(name: impl Into<String>, value: impl Into<String>) -> Self {
        QueryElement::Constant {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn variable(name: impl Into<String>, param: ParamRef) -> Self {
        QueryElement::Variable {
            name: name.into(),
            param,
        }
    }

    /// Parse `"name=value"`, splitting at the first `=` and trimming both
    /// sides. A string without `=` is an error, not an empty pair.
    pub fn parse_constant(query: &str) -> Result<Self, ElementParseError> {
        let (name, value) = query
            .split_once('=')
            .ok_or_else(|| ElementParseError::MissingEquals(query.to_string()))?;
        Ok(Self::constant(name.trim(), value.trim()))
    }

    pub fn name(&self) -> &str {
        match self {
            QueryElement::Constant { name, .. } | QueryElement::Variable { name, .. } => name,
        }
    }
}

/// A named request attribute bound to a parameter's runtime value.
/// Attributes travel with the request context, not the URL or body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeElement {
    pub name: String,
    pub param: ParamRef,
}

impl AttributeElement {
    pub fn new(name: impl Into<String>, param: ParamRef) -> Self {
        Self {
            name: name.into(),
            param,
        }
    }
}

/// The parameter sent as request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyElement {
    pub param: ParamRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl BodyElement {
    pub fn new(param: ParamRef, content_type: Option<String>) -> Self {
        Self {
            param,
            content_type: content_type.filter(|ct| !ct.is_empty()),
        }
    }

    /// The synthetic `Content-Type` header implied by this body, if any.
    pub fn content_type_header(&self) -> Option<HeaderElement> {
        self.content_type.as_deref().map(HeaderElement::content_type)
    }
}

// ── Timeouts ────────────────────────────────────────────────────────

/// Connect/request/socket timeouts in milliseconds. `None` is unset.
///
/// On the wire an unset field is written as `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeoutElement {
    #[serde(with = "millis")]
    pub connect: Option<u64>,
    #[serde(with = "millis")]
    pub request: Option<u64>,
    #[serde(with = "millis")]
    pub socket: Option<u64>,
}

impl TimeoutElement {
    /// All fields unset.
    pub const EMPTY: TimeoutElement = TimeoutElement {
        connect: None,
        request: None,
        socket: None,
    };

    /// Build from raw signed values; anything negative is unset.
    pub fn from_millis(connect: i64, request: i64, socket: i64) -> Self {
        Self {
            connect: millis::from_signed(connect),
            request: millis::from_signed(request),
            socket: millis::from_signed(socket),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Override-if-set: each field of `right` replaces the field of `self`
    /// unless it is unset.
    pub fn merge(&self, right: &TimeoutElement) -> TimeoutElement {
        TimeoutElement {
            connect: right.connect.or(self.connect),
            request: right.request.or(self.request),
            socket: right.socket.or(self.socket),
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};

    pub const UNSET: i64 = -1;

    pub fn from_signed(value: i64) -> Option<u64> {
        u64::try_from(value).ok()
    }

    pub fn serialize<S: Serializer>(value: &Option<u64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_u64(*v),
            None => s.serialize_i64(UNSET),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(from_signed(i64::deserialize(d)?))
    }
}
