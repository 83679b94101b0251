use reqspec_ir::MethodSignature;
use thiserror::Error;

/// Why one method could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MethodErrorKind {
    #[error("methods in a client trait must be annotated with #[request] or one of the HTTP method attributes")]
    MissingRouteAnnotation,

    #[error("did not find a parameter for URL placeholder `:{0}`")]
    UnboundPlaceholder(String),

    #[error("client methods must be `async fn` or return a future")]
    NonAsynchronousTarget,
}

/// A method that failed to resolve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{signature}: {kind}")]
pub struct MethodError {
    pub signature: MethodSignature,
    pub kind: MethodErrorKind,
}

impl MethodError {
    pub fn new(signature: MethodSignature, kind: MethodErrorKind) -> Self {
        Self { signature, kind }
    }

    /// Name of the offending method.
    pub fn method(&self) -> &str {
        &self.signature.method
    }
}

/// A problem with the type graph itself rather than one method.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("type `{0}` is not declared")]
    UnknownType(String),

    #[error("`{from}` extends `{to}`, which is already on the inheritance path")]
    CyclicExtension { from: String, to: String },
}

/// Every failure of one root type, for callers that abort on any error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} method(s) and {} type(s) of `{root}` failed to resolve", .failures.len(), .type_errors.len())]
pub struct ResolveError {
    pub root: String,
    pub failures: Vec<MethodError>,
    pub type_errors: Vec<TypeError>,
}
