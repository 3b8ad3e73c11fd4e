//! Placeholder substitution for rule templates.
//!
//! Templates reference node attributes as `<<key>>`. Keys follow identifier
//! syntax (`[A-Za-z_][A-Za-z0-9_]*`). A placeholder whose key is absent from
//! the attribute mapping, or that is not a valid identifier, is kept verbatim.

use crate::types::{value_to_string, Attributes};

pub const OPEN_DELIMITER: &str = "<<";
pub const CLOSE_DELIMITER: &str = ">>";

/// A parsed template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    source: &'a str,
}

impl<'a> Template<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Render against `attributes`, leaving unresolved placeholders literal.
    pub fn render(&self, attributes: &Attributes) -> String {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;
        while let Some(found) = next_placeholder(rest) {
            match found {
                Scan::Placeholder { before, key, tail } => {
                    out.push_str(before);
                    match attributes.get(key) {
                        Some(value) => out.push_str(&value_to_string(value)),
                        None => {
                            out.push_str(OPEN_DELIMITER);
                            out.push_str(key);
                            out.push_str(CLOSE_DELIMITER);
                        }
                    }
                    rest = tail;
                }
                Scan::Literal { text, tail } => {
                    out.push_str(text);
                    rest = tail;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Render `template` against `attributes`.
pub fn substitute(template: &str, attributes: &Attributes) -> String {
    Template::new(template).render(attributes)
}

enum Scan<'a> {
    /// A well-formed `<<key>>` preceded by `before`.
    Placeholder {
        before: &'a str,
        key: &'a str,
        tail: &'a str,
    },
    /// An opening delimiter that does not start a placeholder; `text` ends with it.
    Literal { text: &'a str, tail: &'a str },
}

/// Find the next opening delimiter and classify what follows it.
fn next_placeholder(input: &str) -> Option<Scan<'_>> {
    let start = input.find(OPEN_DELIMITER)?;
    let open_end = start + OPEN_DELIMITER.len();
    let after_open = &input[open_end..];
    if let Some(end) = after_open.find(CLOSE_DELIMITER) {
        let key = &after_open[..end];
        if is_identifier(key) {
            return Some(Scan::Placeholder {
                before: &input[..start],
                key,
                tail: &after_open[end + CLOSE_DELIMITER.len()..],
            });
        }
    }
    Some(Scan::Literal {
        text: &input[..open_end],
        tail: after_open,
    })
}

pub(crate) fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
