//! `kdl-tree` is a fail-fast parser for the [KDL Document
//! Language](https://kdl.dev), a node-based, human-friendly configuration and
//! serialization format. It parses a byte slice into a plain owned value tree
//! and stops at the first error. Unlike [`kdl`](https://crates.io/crates/kdl)
//! it does not preserve formatting or support editing: if all you do is parse
//! a configuration file and read it, this is the smaller tool.
//!
//! ## Example
//!
//! ```rust
//! use kdl_tree::KdlDocument;
//!
//! let doc_str = r#"
//! hello 1 2 3
//!
//! // Comment
//! world prop="value" {
//!     child 1
//!     child 2
//! }
//! "#;
//!
//! let doc: KdlDocument = doc_str.parse().expect("failed to parse KDL");
//!
//! assert_eq!(
//!     doc.iter_args("hello").collect::<Vec<_>>(),
//!     vec![&1i64.into(), &2i64.into(), &3i64.into()]
//! );
//!
//! assert_eq!(
//!     doc.get("world").and_then(|node| node.prop("prop")),
//!     Some(&"value".into())
//! );
//!
//! assert_eq!(doc.get("world").map(|node| node.children().len()), Some(2));
//! ```
//!
//! ## Error Reporting
//!
//! [`KdlError`] implements [`miette::Diagnostic`] and can be used with
//! [`miette::Result`] for pretty-printed diagnostics:
//!
//! ```no_run
//! fn main() -> miette::Result<()> {
//!     "foo (u8)1024".parse::<kdl_tree::KdlDocument>()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Quirks
//!
//! ### Properties
//!
//! Multiple properties with the same name are allowed and all duplicates are
//! preserved, in source order. [`KdlNode::prop`] returns the _last_ value
//! with a matching name.
//!
//! ### Numbers
//!
//! Numeric values are typed by their `(tag)` annotations:
//!
//! * Integer literals are interpreted as [`i64`] by default; `i8`/`i16`/`i32`
//!   annotations range-check and `u8`/`u16`/`u32`/`u64` annotations select
//!   (and range-check) an unsigned [`u64`] value.
//! * Float literals are interpreted as [`f64`] by default; `f32` parses at
//!   single precision.
//! * A literal that does not fit its annotated type rejects the whole
//!   document.
//!
//! ## Minimum Supported Rust Version
//!
//! You must be at least `1.70.0` tall to get on this ride.
//!
//! ## License
//!
//! The code in this repository is covered by [the Apache-2.0
//! License](LICENSE).

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]
#![doc(html_favicon_url = "https://kdl.dev/favicon.ico")]
#![doc(html_logo_url = "https://kdl.dev/logo.svg")]

pub use document::*;
pub use entry::*;
pub use error::*;
pub use node::*;
pub use value::*;

mod document;
mod entry;
mod error;
mod node;
mod value;

mod parser;
mod scanner;
mod token;

/// Parses a KDL document from bytes.
///
/// The input must be valid UTF-8; anything else is rejected before scanning
/// begins. Empty input yields an empty document.
///
/// ```rust
/// let doc = kdl_tree::parse(b"node \"arg\" prop=1").expect("parse failed");
/// assert_eq!(doc.nodes()[0].name(), "node");
/// ```
pub fn parse(bytes: &[u8]) -> Result<KdlDocument, KdlError> {
    if bytes.is_empty() {
        return Ok(KdlDocument::new());
    }
    let text = std::str::from_utf8(bytes).map_err(|_| KdlError::InvalidUtf8)?;
    text.parse()
}
