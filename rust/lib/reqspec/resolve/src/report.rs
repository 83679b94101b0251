//! Per-type resolution results.

use std::collections::HashSet;

use reqspec_ir::{MethodSignature, ResolvedRequestSpec};
use serde::Serialize;
use tracing::warn;

use crate::error::{MethodError, ResolveError, TypeError};

/// Outcome of resolving one root type.
///
/// `specs` keeps walk order. A supertrait reachable through two paths is
/// visited once per path, so the same signature may appear more than once;
/// see [`ResolutionReport::duplicate_signatures`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub root: String,
    pub specs: Vec<ResolvedRequestSpec>,
    #[serde(serialize_with = "display_all")]
    pub failures: Vec<MethodError>,
    #[serde(serialize_with = "display_all")]
    pub type_errors: Vec<TypeError>,
}

impl ResolutionReport {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub(crate) fn record_spec(&mut self, spec: ResolvedRequestSpec) {
        if self.spec(&spec.signature).is_some() {
            warn!(
                root = %self.root,
                signature = %spec.signature,
                "method reached through more than one inheritance path, recording it again"
            );
        }
        self.specs.push(spec);
    }

    /// Failures are recorded once per signature and kind, however many
    /// paths lead to the method.
    pub(crate) fn record_failure(&mut self, failure: MethodError) {
        if !self.failures.contains(&failure) {
            self.failures.push(failure);
        }
    }

    pub(crate) fn record_type_error(&mut self, error: TypeError) {
        if !self.type_errors.contains(&error) {
            self.type_errors.push(error);
        }
    }

    /// First spec recorded for a signature.
    pub fn spec(&self, signature: &MethodSignature) -> Option<&ResolvedRequestSpec> {
        self.specs.iter().find(|s| &s.signature == signature)
    }

    /// First spec recorded for a method name, any owner.
    pub fn spec_named(&self, method: &str) -> Option<&ResolvedRequestSpec> {
        self.specs.iter().find(|s| s.signature.method == method)
    }

    pub fn failure_named(&self, method: &str) -> Option<&MethodError> {
        self.failures.iter().find(|f| f.method() == method)
    }

    /// Signatures recorded more than once, in first-duplicate order.
    pub fn duplicate_signatures(&self) -> Vec<&MethodSignature> {
        let mut seen = HashSet::new();
        let mut dups: Vec<&MethodSignature> = Vec::new();
        for spec in &self.specs {
            if !seen.insert(&spec.signature) && !dups.contains(&&spec.signature) {
                dups.push(&spec.signature);
            }
        }
        dups
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.type_errors.is_empty()
    }

    /// All specs if nothing failed, otherwise every failure.
    pub fn into_result(self) -> Result<Vec<ResolvedRequestSpec>, ResolveError> {
        if self.is_clean() {
            Ok(self.specs)
        } else {
            Err(ResolveError {
                root: self.root,
                failures: self.failures,
                type_errors: self.type_errors,
            })
        }
    }
}

#[allow(clippy::ptr_arg)]
fn display_all<T, S>(items: &Vec<T>, s: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    s.collect_seq(items.iter().map(|item| item.to_string()))
}
