//! Minimal CSS Selectors
//!
//! Enough of the selector grammar for the in-memory document: type,
//! `#id`, `.class`, `[attr]`, `[attr=value]`, `*`, compounds of those, and
//! the descendant combinator (whitespace).

use crate::NodeId;

/// Read access to an element tree
pub(crate) trait ElementView {
    fn tag(&self, node: NodeId) -> &str;
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
}

#[derive(Debug, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, view: &impl ElementView, node: NodeId) -> bool {
        if let Some(tag) = &self.tag {
            if !view.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if view.attribute(node, "id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| view.has_class(node, c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match (view.attribute(node, name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected,
            (None, _) => false,
        })
    }
}

/// Descendant chain of compounds, outermost first
#[derive(Debug, PartialEq)]
pub(crate) struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    /// Parse a selector; `None` for anything outside the supported grammar
    pub(crate) fn parse(input: &str) -> Option<Self> {
        let parts = input
            .split_whitespace()
            .map(parse_compound)
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self { parts })
    }

    pub(crate) fn matches(&self, view: &impl ElementView, node: NodeId) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(view, node) {
            return false;
        }
        // Descendant-only chains can be matched greedily from the right
        let mut current = view.parent(node);
        for compound in ancestors.iter().rev() {
            loop {
                let Some(candidate) = current else {
                    return false;
                };
                current = view.parent(candidate);
                if compound.matches(view, candidate) {
                    break;
                }
            }
        }
        true
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_attribute(body: &str) -> Option<(String, Option<String>)> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            (!name.is_empty() && name.chars().all(is_ident_char)).then(|| (name.to_string(), None))
        }
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(is_ident_char) {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Some((name.to_string(), Some(value.to_string())))
        }
    }
}

fn parse_compound(chunk: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = chunk.chars().peekable();

    match chars.peek() {
        Some('*') => {
            chars.next();
        }
        Some(&c) if is_ident_char(c) => compound.tag = take_ident(&mut chars),
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => compound.id = Some(take_ident(&mut chars)?),
            '.' => compound.classes.push(take_ident(&mut chars)?),
            '[' => {
                let mut body = String::new();
                loop {
                    match chars.next()? {
                        ']' => break,
                        other => body.push(other),
                    }
                }
                compound.attrs.push(parse_attribute(&body)?);
            }
            _ => return None,
        }
    }
    Some(compound)
}
