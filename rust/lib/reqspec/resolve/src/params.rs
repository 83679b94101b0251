//! Placeholder-to-parameter lookup.

use reqspec_ir::{MethodDecl, ParamRef};

/// Find the parameter a URL placeholder refers to.
///
/// A parameter whose override name (`#[param("...")]`) equals `name` wins
/// over one whose own name does. When several parameters claim the same
/// override name, the first declared one is used.
pub fn resolve_param(method: &MethodDecl, name: &str) -> Option<ParamRef> {
    let params = &method.params;
    params
        .iter()
        .position(|p| p.rename.as_deref() == Some(name))
        .or_else(|| params.iter().position(|p| p.name == name))
        .map(|index| ParamRef::new(index, params[index].name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqspec_ir::ParamDecl;

    fn method(params: Vec<ParamDecl>) -> MethodDecl {
        let mut m = MethodDecl::new("m");
        m.params = params;
        m
    }

    fn renamed(name: &str, rename: &str) -> ParamDecl {
        let mut p = ParamDecl::new(name, "String");
        p.rename = Some(rename.into());
        p
    }

    #[test]
    fn own_name() {
        let m = method(vec![ParamDecl::new("a", "u32"), ParamDecl::new("id", "u32")]);
        assert_eq!(resolve_param(&m, "id"), Some(ParamRef::new(1, "id")));
        assert_eq!(resolve_param(&m, "missing"), None);
    }

    #[test]
    fn override_beats_own_name() {
        // `id` is declared first, but `user` claims the placeholder name.
        let m = method(vec![ParamDecl::new("id", "u32"), renamed("user", "id")]);
        assert_eq!(resolve_param(&m, "id"), Some(ParamRef::new(1, "user")));
    }

    #[test]
    fn first_override_wins() {
        let m = method(vec![renamed("a", "key"), renamed("b", "key")]);
        assert_eq!(resolve_param(&m, "key"), Some(ParamRef::new(0, "a")));
    }

    #[test]
    fn renamed_param_still_answers_to_own_name() {
        let m = method(vec![renamed("user", "uid")]);
        assert_eq!(resolve_param(&m, "user"), Some(ParamRef::new(0, "user")));
    }
}
