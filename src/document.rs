use std::fmt::Display;
use std::str::FromStr;

use crate::parser::Parser;
use crate::{KdlError, KdlNode, KdlValue};

/// A parsed KDL document: an ordered sequence of top-level nodes.
///
/// # Examples
///
/// The easiest way to create a `KdlDocument` is to parse it:
/// ```rust
/// # use kdl_tree::KdlDocument;
/// let doc: KdlDocument = "foo 1 2 3\nbar prop=\"value\"".parse().expect("parse failed");
/// assert_eq!(doc.nodes().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KdlDocument {
    pub(crate) nodes: Vec<KdlNode>,
}

impl KdlDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the document's top-level nodes, in source order.
    pub fn nodes(&self) -> &[KdlNode] {
        &self.nodes
    }

    /// Returns `true` if the document has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets the first node with a matching name.
    pub fn get(&self, name: &str) -> Option<&KdlNode> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    /// Gets the first argument of the first node with a matching name. A
    /// shorthand for documents used as key/value stores:
    ///
    /// ```rust
    /// # use kdl_tree::KdlDocument;
    /// let doc: KdlDocument = "foo 1".parse().unwrap();
    /// assert_eq!(doc.get_arg("foo"), Some(&1i64.into()));
    /// ```
    pub fn get_arg(&self, name: &str) -> Option<&KdlValue> {
        self.get(name).and_then(|node| node.get(0))
    }

    /// Iterates over all argument values of the first node with a matching
    /// name. Empty if there is no such node.
    pub fn iter_args(&self, name: &str) -> impl Iterator<Item = &KdlValue> {
        self.get(name)
            .map(|node| node.args())
            .unwrap_or_default()
            .iter()
            .map(|arg| arg.value())
    }
}

impl FromStr for KdlDocument {
    type Err = KdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::new(s).parse()
    }
}

impl Display for KdlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for node in &self.nodes {
            node.write_indented(f, 0)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
