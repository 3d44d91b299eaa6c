use std::num::{ParseFloatError, ParseIntError};

use miette::Diagnostic;
use thiserror::Error;

/// The error type for KDL parsing: returned when a document fails to parse.
///
/// Parsing is fail-fast: the first detected problem aborts the parse and no
/// partial document is returned. This type implements [`miette::Diagnostic`]
/// and can be used with [`miette::Result`] for pretty-printed reports:
///
/// ```no_run
/// fn main() -> miette::Result<()> {
///     let _doc: kdl_tree::KdlDocument = "node (u8)1024".parse()?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
pub enum KdlError {
    /// The input bytes were not valid UTF-8. Detected before scanning.
    #[error("document must contain valid UTF-8")]
    #[diagnostic(code(kdl_tree::invalid_utf8))]
    InvalidUtf8,

    /// A token appeared somewhere the grammar does not allow it.
    #[error("unexpected token: {0}")]
    #[diagnostic(code(kdl_tree::unexpected_token))]
    UnexpectedToken(String),

    /// The input ended in the middle of a syntactic unit.
    #[error("unexpected end of input")]
    #[diagnostic(code(kdl_tree::unexpected_eof))]
    UnexpectedEof,

    /// A string literal was still open when the input ended.
    #[error("error reading string literal: reached EOF")]
    #[diagnostic(code(kdl_tree::unterminated_string))]
    UnterminatedString,

    /// A `\x` escape the string grammar does not define.
    #[error("invalid escape sequence: \\{0}")]
    #[diagnostic(
        code(kdl_tree::invalid_escape),
        help("valid escapes are \\n, \\r, \\t, \\\\, \\/, \\\", \\b, \\f, and \\u{{…}}")
    )]
    InvalidEscape(String),

    /// A `/*` comment was still open when the input ended.
    #[error("no closing of multiline comment")]
    #[diagnostic(code(kdl_tree::unterminated_comment))]
    UnterminatedComment,

    /// A `(` type annotation was not closed by `)`.
    #[error("unclosed type annotation")]
    #[diagnostic(code(kdl_tree::unclosed_annotation))]
    UnclosedTypeAnnotation,

    /// A type annotation was empty or contained runes other than Unicode
    /// letters and digits.
    #[error("invalid type annotation: {0:?}")]
    #[diagnostic(code(kdl_tree::invalid_annotation))]
    InvalidTypeAnnotation(String),

    /// A type annotation appeared where no value can follow it, or was
    /// applied to `null`, `true`, or `false`.
    #[error("unexpected type annotation")]
    #[diagnostic(
        code(kdl_tree::unexpected_annotation),
        help("annotations bind to the value immediately following them")
    )]
    UnexpectedTypeAnnotation,

    /// A numeric literal the scanner could not make sense of.
    #[error("invalid number literal: {0}")]
    #[diagnostic(code(kdl_tree::invalid_number))]
    InvalidNumber(String),

    /// A non-numeric annotation on an integer literal.
    #[error("invalid type annotation for integer: {0}")]
    #[diagnostic(code(kdl_tree::invalid_integer_annotation))]
    InvalidIntegerAnnotation(String),

    /// A non-float annotation on a float literal.
    #[error("invalid type annotation for float: {0}")]
    #[diagnostic(code(kdl_tree::invalid_float_annotation))]
    InvalidFloatAnnotation(String),

    /// A numeric annotation on a string value.
    #[error("invalid type annotation for string: {0}")]
    #[diagnostic(code(kdl_tree::invalid_string_annotation))]
    InvalidStringAnnotation(String),

    /// Tried to parse a negative literal under an unsigned annotation.
    #[error("tried to parse a negative number as an unsigned integer")]
    #[diagnostic(code(kdl_tree::negative_unsigned))]
    NegativeUnsignedError,

    /// An integer literal did not fit the target type.
    #[error(transparent)]
    #[diagnostic(code(kdl_tree::parse_int))]
    ParseIntError(#[from] ParseIntError),

    /// A float literal could not be parsed at the target width.
    #[error(transparent)]
    #[diagnostic(code(kdl_tree::parse_float))]
    ParseFloatError(#[from] ParseFloatError),

    /// A property name was not followed by `=`.
    #[error("invalid node property: {0}: expected '=' after identifier")]
    #[diagnostic(code(kdl_tree::missing_equals))]
    MissingEquals(String),

    /// The right-hand side of a property was not a number, string, or
    /// keyword.
    #[error("invalid property value")]
    #[diagnostic(
        code(kdl_tree::invalid_property_value),
        help("property values are numbers, strings, or null/true/false")
    )]
    InvalidPropertyValue,

    /// A quoted node name resolved to the empty string.
    #[error("node name must not be empty")]
    #[diagnostic(code(kdl_tree::empty_node_name))]
    EmptyNodeName,
}
