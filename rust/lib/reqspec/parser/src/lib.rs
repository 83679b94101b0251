//! reqspec DSL Parser
//!
//! Parses annotated Rust traits (syn) into declaration IR.
//! Used by:
//! - proc macro (at compile time, one trait at a time)
//! - codegen binary (reads whole source files)

pub mod client_parser;
pub mod util;

pub use client_parser::{
    is_async_signature, parse_file, parse_method, parse_trait, METHOD_ATTRS, PARAM_ATTRS,
    TYPE_ATTRS,
};
