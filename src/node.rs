use std::fmt::Display;

use crate::token::is_identifier_char;
use crate::{KdlArg, KdlProp, KdlValue};

/// A single KDL node: a name, positional arguments, named properties, and
/// child nodes.
///
/// Nodes own their contents exclusively; there is no sharing between nodes
/// and no back-references. Everything is created during parsing and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct KdlNode {
    pub(crate) name: String,
    pub(crate) ty: Option<String>,
    pub(crate) args: Vec<KdlArg>,
    pub(crate) props: Vec<KdlProp>,
    pub(crate) children: Vec<KdlNode>,
}

impl KdlNode {
    pub(crate) fn new(name: String, ty: Option<String>) -> Self {
        KdlNode {
            name,
            ty,
            args: Vec::new(),
            props: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Gets the node's name. Never empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the node's type annotation, if any.
    pub fn ty(&self) -> Option<&str> {
        self.ty.as_deref()
    }

    /// Returns the node's positional arguments, in source order.
    pub fn args(&self) -> &[KdlArg] {
        &self.args
    }

    /// Returns the node's properties, in source order. Duplicate names are
    /// preserved.
    pub fn props(&self) -> &[KdlProp] {
        &self.props
    }

    /// Returns the node's children, in source order.
    pub fn children(&self) -> &[KdlNode] {
        &self.children
    }

    /// Gets the value of the argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&KdlValue> {
        self.args.get(index).map(|arg| arg.value())
    }

    /// Gets the value of the *last* property with a matching name, if any.
    /// The tree itself keeps every duplicate; only this accessor is
    /// last-wins.
    pub fn prop(&self, name: &str) -> Option<&KdlValue> {
        self.props
            .iter()
            .rev()
            .find(|prop| prop.name() == name)
            .map(|prop| prop.value())
    }

    pub(crate) fn write_indented(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        indent: usize,
    ) -> std::fmt::Result {
        write!(f, "{:width$}", "", width = indent * 2)?;
        if let Some(ty) = &self.ty {
            write!(f, "({})", ty)?;
        }
        write_ident(f, &self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        for prop in &self.props {
            write!(f, " {}", prop)?;
        }
        if !self.children.is_empty() {
            writeln!(f, " {{")?;
            for child in &self.children {
                child.write_indented(f, indent + 1)?;
                writeln!(f)?;
            }
            write!(f, "{:width$}}}", "", width = indent * 2)?;
        }
        Ok(())
    }
}

impl Display for KdlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Writes an identifier bare when it would scan as one, quoted otherwise.
pub(crate) fn write_ident(f: &mut std::fmt::Formatter<'_>, ident: &str) -> std::fmt::Result {
    if is_bare_ident(ident) {
        write!(f, "{}", ident)
    } else {
        write!(f, "{:?}", ident)
    }
}

/// Whether `ident` re-parses as a bare identifier: non-empty, made of
/// identifier runes, not digit-initial, not sign-then-digit, and not a
/// keyword literal.
fn is_bare_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if first.is_ascii_digit() || !is_identifier_char(first) {
        return false;
    }
    if matches!(first, '-' | '+')
        && ident
            .chars()
            .nth(1)
            .is_some_and(|second| second.is_ascii_digit())
    {
        return false;
    }
    chars.all(is_identifier_char) && !matches!(ident, "null" | "true" | "false")
}

#[cfg(test)]
mod test {
    use super::*;

    fn node(name: &str) -> KdlNode {
        KdlNode::new(name.into(), None)
    }

    #[test]
    fn bare_idents() {
        assert!(is_bare_ident("node"));
        assert!(is_bare_ident("child-1"));
        assert!(is_bare_ident("-this_actually::WORKS?"));
        assert!(is_bare_ident("Node.js"));
        assert!(!is_bare_ident(""));
        assert!(!is_bare_ident("1node"));
        assert!(!is_bare_ident("-1"));
        assert!(!is_bare_ident("has space"));
        assert!(!is_bare_ident("a=b"));
        assert!(!is_bare_ident("null"));
    }

    #[test]
    fn display_plain() {
        assert_eq!(format!("{}", node("node")), "node");
        assert_eq!(format!("{}", node("Node Name?")), "\"Node Name?\"");

        let mut n = node("node");
        n.ty = Some("widget".into());
        n.args.push(KdlArg::from("arg"));
        n.props.push(KdlProp::from(("prop", 1i64)));
        assert_eq!(format!("{}", n), "(widget)node \"arg\" prop=1");
    }

    #[test]
    fn display_children() {
        let mut parent = node("parent");
        let mut inner = node("inner");
        inner.children.push(node("leaf"));
        parent.children.push(node("child-1"));
        parent.children.push(inner);
        assert_eq!(
            format!("{}", parent),
            "parent {\n  child-1\n  inner {\n    leaf\n  }\n}"
        );
    }

    #[test]
    fn prop_accessor_is_last_wins() {
        let mut n = node("node");
        n.props.push(KdlProp::from(("key", 1i64)));
        n.props.push(KdlProp::from(("key", 2i64)));
        assert_eq!(n.prop("key"), Some(&KdlValue::Integer(2)));
        assert_eq!(n.props().len(), 2);
    }
}
