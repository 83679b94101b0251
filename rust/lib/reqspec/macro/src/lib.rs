//! reqspec proc macros.
//!
//! `#[client]` marks a trait as a declarative HTTP client:
//!   - Reads route, header, query, timeout and parameter metadata
//!   - Resolves one request spec per method, failing compilation on
//!     missing routes, unbound URL placeholders or non-async methods
//!   - Strips the helper attributes from the trait
//!   - Embeds the resolved specs as a JSON const next to the trait

use proc_macro::TokenStream;
use syn::parse_macro_input;

mod client;

/// Define a declarative HTTP client.
///
/// ```ignore
/// #[client]
/// #[header("Accept", "application/json")]
/// pub trait Users {
///     #[get("/users/:id")]
///     async fn find(&self, id: u64) -> User;
///
///     #[post("/users")]
///     async fn create(&self, #[body("application/json")] user: NewUser) -> User;
/// }
/// ```
///
/// Generates:
/// - the trait itself, helper attributes removed
/// - `__USERS_REQUEST_SPECS`, a JSON array of resolved request specs
///
/// Supertraits are not visible to the macro; their methods are resolved
/// where they are declared, or by the `reqspec` binary over whole sources.
/// Put `#[client]` above the other trait-level attributes.
#[proc_macro_attribute]
pub fn client(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as syn::ItemTrait);
    client::expand(attr.into(), item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
