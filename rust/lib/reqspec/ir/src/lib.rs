//! reqspec Intermediate Representation (IR)
//!
//! Data structures shared between:
//! - parser (reads annotated traits into declarations)
//! - resolver (merges fragments along the supertrait chain)
//! - proc macro and codegen binary (hand resolved specs to an emitter)
//!
//! Layers, leaves first:
//! 1. Types     — header/query/attribute/body/timeout elements, HTTP verbs
//! 2. Template  — URL template scanner and compiler
//! 3. Fragment  — partial configurations and the merge algebra
//! 4. Decl      — raw per-declaration metadata (the provider's output)
//! 5. Spec      — the canonical per-method result and the emitter boundary

pub mod types;
pub mod template;
pub mod fragment;
pub mod decl;
pub mod spec;

pub use types::*;
pub use template::*;
pub use fragment::*;
pub use decl::*;
pub use spec::*;
