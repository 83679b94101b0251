//! Hierarchy walk: merges class-level metadata down the supertrait chain.
//!
//! Starting from a root type with an empty accumulator:
//! - the type's class fragment is merged onto the accumulator
//! - every method declared on the type is resolved against it
//! - each supertrait is walked in declared order, carrying the accumulator
//!
//! The root's class metadata therefore sits to the left of its supertraits'
//! and wins on header collisions. Supertraits the provider does not know are
//! skipped. A supertrait reachable through several paths is walked once per
//! path.
//!
//! Metadata flows only from subtype to supertrait. A type's own methods see
//! the class metadata of the types walked so far (itself and the subtypes on
//! its path), never the headers or timeouts of its supertraits.

use std::collections::HashMap;

use reqspec_ir::{
    Fragment, MetadataProvider, MethodFragment, MethodSignature, ResolvedRequestSpec, TypeDecl,
};
use tracing::debug;

use crate::collect::{class_fragment, method_fragment};
use crate::error::{MethodError, MethodErrorKind, TypeError};
use crate::report::ResolutionReport;

/// Resolve every method reachable from `root`.
pub fn resolve<P: MetadataProvider + ?Sized>(provider: &P, root: &str) -> ResolutionReport {
    let mut report = ResolutionReport::new(root);
    let Some(nodes) = Nodes::build(provider, root) else {
        report.record_type_error(TypeError::UnknownType(root.to_string()));
        return report;
    };

    let mut path = Vec::new();
    nodes.walk(0, &Fragment::Empty, &mut path, &mut report);
    debug!(
        root,
        types = nodes.0.len(),
        specs = report.specs.len(),
        failures = report.failures.len(),
        "resolved client type"
    );
    report
}

/// Resolve every type the provider marks for generation.
pub fn resolve_all<P: MetadataProvider + ?Sized>(provider: &P) -> Vec<ResolutionReport> {
    provider
        .client_types()
        .into_iter()
        .map(|ty| resolve(provider, &ty.name))
        .collect()
}

/// A type with its own fragments already built.
struct Node<'a> {
    name: &'a str,
    class: Fragment,
    methods: Vec<(MethodSignature, Result<MethodFragment, MethodErrorKind>)>,
    extends: Vec<usize>,
}

impl<'a> Node<'a> {
    fn new(decl: &'a TypeDecl) -> Self {
        Self {
            name: &decl.name,
            class: class_fragment(decl),
            methods: decl
                .methods
                .iter()
                .map(|m| (m.signature(&decl.name), method_fragment(m)))
                .collect(),
            extends: Vec::new(),
        }
    }
}

/// Every type reachable from the root, root first.
struct Nodes<'a>(Vec<Node<'a>>);

impl<'a> Nodes<'a> {
    fn build<P: MetadataProvider + ?Sized>(provider: &'a P, root: &str) -> Option<Self> {
        let root = provider.type_decl(root)?;
        let mut decls: Vec<&'a TypeDecl> = vec![root];
        let mut index: HashMap<&'a str, usize> = HashMap::from([(root.name.as_str(), 0)]);
        let mut nodes = Vec::new();

        // `decls` grows while we iterate; every entry gets its node in turn.
        let mut next = 0;
        while next < decls.len() {
            let decl = decls[next];
            let mut node = Node::new(decl);
            for ext in &decl.extends {
                if let Some(&i) = index.get(ext.as_str()) {
                    node.extends.push(i);
                    continue;
                }
                match provider.type_decl(ext) {
                    Some(ext_decl) => {
                        let i = decls.len();
                        decls.push(ext_decl);
                        index.insert(ext_decl.name.as_str(), i);
                        node.extends.push(i);
                    }
                    None => debug!(
                        ty = %decl.name,
                        supertrait = %ext,
                        "supertrait has no declaration, skipping"
                    ),
                }
            }
            nodes.push(node);
            next += 1;
        }
        Some(Self(nodes))
    }

    fn walk(
        &self,
        at: usize,
        acc: &Fragment,
        path: &mut Vec<usize>,
        report: &mut ResolutionReport,
    ) {
        let node = &self.0[at];
        let acc = acc.merge(&node.class);
        path.push(at);

        for (signature, fragment) in &node.methods {
            match fragment {
                Ok(fragment) => report.record_spec(ResolvedRequestSpec::from_fragment(
                    signature.clone(),
                    acc.apply(fragment),
                )),
                Err(kind) => {
                    report.record_failure(MethodError::new(signature.clone(), kind.clone()))
                }
            }
        }

        for &ext in &node.extends {
            if path.contains(&ext) {
                report.record_type_error(TypeError::CyclicExtension {
                    from: node.name.to_string(),
                    to: self.0[ext].name.to_string(),
                });
                continue;
            }
            self.walk(ext, &acc, path, report);
        }

        path.pop();
    }
}
