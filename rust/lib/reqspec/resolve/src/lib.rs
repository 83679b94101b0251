//! reqspec resolver
//!
//! Turns declarations into resolved request specs:
//! - Parameter lookup for URL placeholders (override names first)
//! - Fragment collection from raw declarations, with validation
//! - Hierarchy walk that merges class-level fragments down the
//!   supertrait chain into every declared method
//!
//! Errors are local to one method. A per-type [`ResolutionReport`] keeps
//! what resolved apart from what failed and leaves the abort-or-skip
//! decision to the caller.

pub mod error;
pub mod params;
pub mod collect;
pub mod hierarchy;
pub mod report;

pub use error::{MethodError, MethodErrorKind, ResolveError, TypeError};
pub use params::resolve_param;
pub use collect::{class_fragment, method_fragment};
pub use hierarchy::{resolve, resolve_all};
pub use report::ResolutionReport;
