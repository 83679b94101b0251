//! Resolved request specs: the emitter boundary.

use serde::{Deserialize, Serialize};

use crate::decl::MethodSignature;
use crate::fragment::MethodFragment;
use crate::template::{self, TemplatePart};
use crate::types::{
    AttributeElement, BodyElement, HeaderElement, HttpMethod, QueryElement, TimeoutElement,
};

/// The canonical configuration of one method.
///
/// Every URL variable is bound, headers and attributes are deduplicated,
/// and the verb is concrete. An emitter needs nothing else to produce code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRequestSpec {
    pub signature: MethodSignature,
    pub method: HttpMethod,
    pub url: Vec<TemplatePart>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyElement>,
    #[serde(default)]
    pub headers: Vec<HeaderElement>,
    #[serde(default)]
    pub attributes: Vec<AttributeElement>,
    #[serde(default)]
    pub query: Vec<QueryElement>,
    #[serde(default)]
    pub timeout: TimeoutElement,
}

impl ResolvedRequestSpec {
    /// Finalize a fully merged method fragment.
    pub fn from_fragment(signature: MethodSignature, fragment: MethodFragment) -> Self {
        let headers = fragment.effective_headers();
        let attributes = fragment.effective_attributes();
        Self {
            signature,
            method: fragment.method,
            url: fragment.url,
            body: fragment.body,
            headers,
            attributes,
            query: fragment.query,
            timeout: fragment.timeout,
        }
    }

    pub fn is_standard_method(&self) -> bool {
        self.method.is_standard()
    }

    /// No URL part depends on a parameter.
    pub fn url_is_constant(&self) -> bool {
        self.url.iter().all(TemplatePart::is_constant)
    }

    /// The URL template as declared.
    pub fn url_template(&self) -> String {
        template::render(&self.url)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

/// Turns resolved specs into emitter output.
pub trait SpecEmitter {
    type Output;
    type Error;

    fn emit(&self, spec: &ResolvedRequestSpec) -> Result<Self::Output, Self::Error>;

    fn emit_all<'a, I>(&self, specs: I) -> Result<Vec<Self::Output>, Self::Error>
    where
        I: IntoIterator<Item = &'a ResolvedRequestSpec>,
    {
        specs.into_iter().map(|s| self.emit(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParamRef;

    #[test]
    fn finalize_applies_content_type_and_dedup() {
        let mut fragment = MethodFragment::new(
            HttpMethod::Post,
            vec![
                TemplatePart::constant("/items/"),
                TemplatePart::variable("id", ParamRef::new(0, "id")),
            ],
        );
        fragment.body = Some(BodyElement::new(
            ParamRef::new(1, "item"),
            Some("application/json".into()),
        ));
        fragment.headers.push(HeaderElement::new("Content-Type", "text/plain"));
        fragment.headers.push(HeaderElement::new("Accept", "*/*"));

        let spec = ResolvedRequestSpec::from_fragment(
            MethodSignature::new("Items", "update", vec!["u64".into(), "Item".into()]),
            fragment,
        );
        assert_eq!(spec.header("Content-Type"), Some("application/json"));
        assert_eq!(spec.headers.len(), 2);
        assert!(!spec.url_is_constant());
        assert_eq!(spec.url_template(), "/items/:id");
        assert!(spec.is_standard_method());
    }

    struct MethodLine;

    impl SpecEmitter for MethodLine {
        type Output = String;
        type Error = std::convert::Infallible;

        fn emit(&self, spec: &ResolvedRequestSpec) -> Result<String, Self::Error> {
            Ok(format!("{} {}", spec.method, spec.url_template()))
        }
    }

    #[test]
    fn emitter_contract() {
        let spec = ResolvedRequestSpec::from_fragment(
            MethodSignature::new("A", "m", vec![]),
            MethodFragment::new(HttpMethod::Custom("PURGE".into()), vec![TemplatePart::constant("/c")]),
        );
        let out = MethodLine.emit_all([&spec, &spec]).unwrap();
        assert_eq!(out, vec!["PURGE /c".to_string(), "PURGE /c".to_string()]);
    }
}
