//! Shared parser utilities.

use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Expr, ExprLit, ExprUnary, Ident, Lit, LitStr, Meta, Token, UnOp};

/// Check if an attribute has a given path identifier.
pub fn attr_is(attr: &Attribute, name: &str) -> bool {
    attr.path().is_ident(name)
}

/// Arguments of a helper attribute: string literals by position, or
/// `key = value` pairs, in any mix.
///
/// `#[header("X-Api", "1")]` and `#[header(name = "X-Api", value = "1")]`
/// read the same through [`AttrArgs::string`].
#[derive(Default)]
pub struct AttrArgs {
    pub positional: Vec<LitStr>,
    pub named: Vec<(Ident, Expr)>,
}

impl Parse for AttrArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = AttrArgs::default();
        while !input.is_empty() {
            if input.peek(Ident) && input.peek2(Token![=]) {
                let key: Ident = input.parse()?;
                input.parse::<Token![=]>()?;
                args.named.push((key, input.parse()?));
            } else {
                args.positional.push(input.parse()?);
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(args)
    }
}

impl AttrArgs {
    /// Parse the arguments of `attr`. A bare `#[name]` has none.
    pub fn from_attr(attr: &Attribute) -> syn::Result<Self> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            Meta::List(list) => syn::parse2(list.tokens.clone()),
            Meta::NameValue(nv) => Err(syn::Error::new_spanned(
                nv,
                "expected parenthesized arguments, e.g. #[name(\"...\")]",
            )),
        }
    }

    /// Reject keys not in `allowed`.
    pub fn expect_keys(&self, allowed: &[&str]) -> syn::Result<()> {
        for (key, _) in &self.named {
            if !allowed.iter().any(|a| key == a) {
                return Err(syn::Error::new_spanned(
                    key,
                    format!("unknown argument `{key}`, expected one of: {}", allowed.join(", ")),
                ));
            }
        }
        Ok(())
    }

    fn value(&self, key: &str) -> Option<&Expr> {
        self.named.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The string under `key`, or else the positional literal at `pos`.
    pub fn string(&self, pos: usize, key: &str) -> syn::Result<Option<LitStr>> {
        if let Some(expr) = self.value(key) {
            return match expr {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Ok(Some(s.clone())),
                other => Err(syn::Error::new_spanned(
                    other,
                    format!("`{key}` must be a string literal"),
                )),
            };
        }
        Ok(self.positional.get(pos).cloned())
    }

    /// Like [`AttrArgs::string`], failing with `usage` when absent.
    pub fn require_string(
        &self,
        attr: &Attribute,
        pos: usize,
        key: &str,
        usage: &str,
    ) -> syn::Result<LitStr> {
        self.string(pos, key)?
            .ok_or_else(|| syn::Error::new_spanned(attr, format!("expected {usage}")))
    }

    /// An integer under `key`; negative literals are allowed.
    pub fn int(&self, key: &str) -> syn::Result<Option<i64>> {
        self.value(key).map(int_expr).transpose()
    }
}

/// Evaluate an integer literal, optionally negated.
fn int_expr(expr: &Expr) -> syn::Result<i64> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Int(i), ..
        }) => i.base10_parse(),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr,
            ..
        }) => int_expr(expr).map(|v| -v),
        Expr::Paren(p) => int_expr(&p.expr),
        other => Err(syn::Error::new_spanned(other, "expected an integer literal")),
    }
}

/// Render a type the way it is written, without token spacing.
/// e.g. `Option < Vec < u8 > >` → `Option<Vec<u8>>`, `& 'a str` → `&'a str`.
pub fn type_to_string(ty: &syn::Type) -> String {
    let raw = quote::quote!(#ty).to_string();
    let chars: Vec<char> = raw.chars().collect();
    let word = |c: char| c.is_alphanumeric() || c == '_' || c == '\'';
    let mut out = String::with_capacity(raw.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1).copied();
            if let (Some(p), Some(n)) = (prev, next) {
                if word(p) && word(n) {
                    out.push(' ');
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}
