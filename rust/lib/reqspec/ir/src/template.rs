//! URL template compiler.
//!
//! A template is literal text with `:name` placeholders, e.g.
//! `/users/:id/posts`. A placeholder is a `:` followed by a lowercase
//! ASCII letter and then any run of ASCII letters, digits or `_`. Every
//! other character, including a `:` that does not start a placeholder,
//! is literal.
//!
//! Compiling binds each placeholder to a method parameter. Binding is
//! eager: the first placeholder without a parameter aborts the whole
//! compilation and no partial part list escapes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ParamRef;

/// One piece of a compiled URL template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TemplatePart {
    Constant {
        text: String,
    },
    Variable {
        /// Placeholder name, used for parameter lookup.
        name: String,
        /// Placeholder text as written after the colon.
        matched: String,
        param: ParamRef,
    },
}

impl TemplatePart {
    pub fn constant(text: impl Into<String>) -> Self {
        TemplatePart::Constant { text: text.into() }
    }

    pub fn variable(name: impl Into<String>, param: ParamRef) -> Self {
        let name = name.into();
        TemplatePart::Variable {
            matched: name.clone(),
            name,
            param,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, TemplatePart::Constant { .. })
    }
}

/// A placeholder that no parameter answers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("did not find a parameter for URL placeholder `:{name}`")]
pub struct UnboundPlaceholder {
    pub name: String,
}

/// Raw scanner output, before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

#[derive(Clone, Copy)]
enum State {
    Literal,
    /// Just consumed a `:`.
    Colon,
    /// Inside a placeholder name that started at the given byte offset.
    Name(usize),
}

/// Split a template into literal runs and placeholder names.
///
/// Empty literal runs are never produced.
pub fn scan(template: &str) -> Vec<Token<'_>> {
    let bytes = template.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut state = State::Literal;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Literal => {
                if b == b':' {
                    state = State::Colon;
                }
                i += 1;
            }
            State::Colon => {
                if b.is_ascii_lowercase() {
                    state = State::Name(i);
                    i += 1;
                } else {
                    // Not a placeholder; re-read this byte as literal text.
                    state = State::Literal;
                }
            }
            State::Name(start) => {
                if b.is_ascii_alphanumeric() || b == b'_' {
                    i += 1;
                } else {
                    push_placeholder(&mut tokens, template, literal_start, start, i);
                    literal_start = i;
                    state = State::Literal;
                }
            }
        }
    }

    if let State::Name(start) = state {
        push_placeholder(&mut tokens, template, literal_start, start, bytes.len());
        literal_start = bytes.len();
    }
    if literal_start < bytes.len() {
        tokens.push(Token::Literal(&template[literal_start..]));
    }

    tokens
}

/// Push the literal run before a placeholder's colon, then the placeholder.
fn push_placeholder<'a>(
    tokens: &mut Vec<Token<'a>>,
    template: &'a str,
    literal_start: usize,
    name_start: usize,
    name_end: usize,
) {
    let colon = name_start - 1;
    if colon > literal_start {
        tokens.push(Token::Literal(&template[literal_start..colon]));
    }
    tokens.push(Token::Placeholder(&template[name_start..name_end]));
}

/// Compile a template, binding each placeholder through `resolve`.
pub fn compile<F>(template: &str, mut resolve: F) -> Result<Vec<TemplatePart>, UnboundPlaceholder>
where
    F: FnMut(&str) -> Option<ParamRef>,
{
    scan(template)
        .into_iter()
        .map(|token| match token {
            Token::Literal(text) => Ok(TemplatePart::constant(text)),
            Token::Placeholder(name) => resolve(name)
                .map(|param| TemplatePart::Variable {
                    name: name.to_string(),
                    matched: name.to_string(),
                    param,
                })
                .ok_or_else(|| UnboundPlaceholder {
                    name: name.to_string(),
                }),
        })
        .collect()
}

/// Render compiled parts back to template text.
pub fn render(parts: &[TemplatePart]) -> String {
    let mut out = String::new();
    for part in parts {
        match part {
            TemplatePart::Constant { text } => out.push_str(text),
            TemplatePart::Variable { matched, .. } => {
                out.push(':');
                out.push_str(matched);
            }
        }
    }
    out
}
