use tracing::trace;

use crate::scanner::Scanner;
use crate::token::{is_initial_ident_token, is_newline, Token};
use crate::{KdlArg, KdlDocument, KdlError, KdlNode, KdlProp, KdlValue};

/// Recursive-descent parser over the scanner's token stream.
///
/// Three mutually recursive procedures do the work: [`Parser::parse_scope`]
/// reads a run of sibling nodes (the document root or a `{ … }` block),
/// [`Parser::scan_node`] reads one node's body, and [`Parser::scan_prop`]
/// reads the right-hand side of a `name=value` pair. The leaf helpers for
/// string bodies and type annotations consume the rune stream directly.
///
/// Parsing is fail-fast: the first error aborts and nothing partial escapes.
pub(crate) struct Parser<'a> {
    sc: Scanner<'a>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Parser {
            sc: Scanner::new(source),
        }
    }

    pub(crate) fn parse(mut self) -> Result<KdlDocument, KdlError> {
        let nodes = self.parse_scope(false)?;
        Ok(KdlDocument { nodes })
    }

    /// Parses sibling nodes until EOF or, when `is_child`, the closing `}`.
    fn parse_scope(&mut self, is_child: bool) -> Result<Vec<KdlNode>, KdlError> {
        let mut nodes = Vec::new();
        loop {
            let (token, literal) = self.sc.scan();
            match token {
                Token::Eof => break,
                Token::Ws | Token::Semicolon => {}
                Token::CBrackClose => {
                    if is_child {
                        break;
                    }
                    return Err(KdlError::UnexpectedToken(literal));
                }
                Token::CommentLine => self.sc.scan_line(),
                Token::CommentMulOpen => self.scan_multiline_comment()?,
                Token::CommentSd => {
                    // The next node is parsed normally, then dropped.
                    self.expect_node()?;
                }
                Token::Quote
                | Token::RawStrOpen
                | Token::RawStrHashOpen
                | Token::RawStrHashClose
                | Token::ParenOpen => {
                    self.sc.unread(token, literal);
                    nodes.push(self.expect_node()?);
                }
                Token::Invalid => return Err(KdlError::InvalidNumber(literal)),
                _ if is_initial_ident_token(token) => {
                    self.sc.unread(token, literal);
                    nodes.push(self.expect_node()?);
                }
                _ => return Err(KdlError::UnexpectedToken(literal)),
            }
        }
        Ok(nodes)
    }

    /// Reads one node: an optional `(tag)` annotation, the name, then the
    /// body. Whitespace and comments before the node are skipped, which also
    /// serves the slash-dash form `/- node`.
    fn expect_node(&mut self) -> Result<KdlNode, KdlError> {
        let mut ty: Option<String> = None;
        loop {
            let (token, literal) = self.sc.scan();
            if ty.is_some() && matches!(token, Token::Ws | Token::CommentLine | Token::CommentMulOpen)
            {
                // The annotation must bind to the name directly.
                return Err(KdlError::UnexpectedTypeAnnotation);
            }
            match token {
                Token::Ws => {}
                Token::CommentLine => self.sc.scan_line(),
                Token::CommentMulOpen => self.scan_multiline_comment()?,
                Token::ParenOpen => {
                    if ty.is_some() {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    ty = Some(self.scan_type_annotation()?);
                }
                Token::Quote | Token::RawStrOpen | Token::RawStrHashOpen
                | Token::RawStrHashClose => {
                    let name = guard_name(self.scan_string_body(token, &literal)?)?;
                    return self.scan_node(name, ty);
                }
                Token::Eof => return Err(KdlError::UnexpectedEof),
                _ if is_initial_ident_token(token) => {
                    let name = format!("{literal}{}", self.sc.scan_bare_ident());
                    return self.scan_node(name, ty);
                }
                _ => return Err(KdlError::UnexpectedToken(literal)),
            }
        }
    }

    /// Reads a node body: arguments, properties, annotations, child blocks,
    /// and the terminator. `name` has already been read by the caller.
    fn scan_node(&mut self, name: String, ty: Option<String>) -> Result<KdlNode, KdlError> {
        trace!(name = %name, "scanning node");
        let mut node = KdlNode::new(name, ty);
        // A `(tag)` waiting to bind to the next value or property.
        let mut annotation: Option<String> = None;
        // Set by `/-`: the next argument, property, or child block is parsed,
        // then dropped.
        let mut skip = false;

        loop {
            let (token, literal) = self.sc.scan();
            match token {
                Token::Eof => {
                    if skip {
                        return Err(KdlError::UnexpectedEof);
                    }
                    break;
                }
                Token::Backslash => {
                    if annotation.is_some() {
                        return Err(KdlError::UnexpectedTypeAnnotation);
                    }
                    // Line continuation: swallow the following whitespace and
                    // keep going on the next line.
                    let (next, next_literal) = self.sc.scan();
                    if next != Token::Ws {
                        self.sc.unread(next, next_literal);
                    }
                }
                Token::Semicolon => {
                    if annotation.is_some() {
                        return Err(KdlError::UnexpectedTypeAnnotation);
                    }
                    if skip {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    break;
                }
                Token::Ws => {
                    if literal.chars().any(is_newline) {
                        if skip {
                            return Err(KdlError::UnexpectedToken(literal));
                        }
                        break;
                    }
                }
                Token::CommentLine => {
                    if skip {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    self.sc.scan_line();
                    break;
                }
                Token::CommentMulOpen => self.scan_multiline_comment()?,
                Token::CommentSd => skip = true,
                Token::NumInt => {
                    let value = KdlValue::integer(&literal, annotation.as_deref())?;
                    if skip {
                        skip = false;
                        annotation = None;
                    } else {
                        node.args.push(KdlArg::new(value, annotation.take()));
                    }
                }
                Token::NumFloat | Token::NumSci => {
                    let value = KdlValue::float(&literal, annotation.as_deref())?;
                    if skip {
                        skip = false;
                        annotation = None;
                    } else {
                        node.args.push(KdlArg::new(value, annotation.take()));
                    }
                }
                Token::Invalid => return Err(KdlError::InvalidNumber(literal)),
                Token::Quote | Token::RawStrOpen | Token::RawStrHashOpen
                | Token::RawStrHashClose => {
                    let string = self.scan_string_body(token, &literal)?;
                    let (next, next_literal) = self.sc.scan();
                    if next == Token::Equal {
                        // The string was a property name.
                        let prop = self.scan_prop(string, annotation.take())?;
                        if skip {
                            skip = false;
                        } else {
                            node.props.push(prop);
                        }
                    } else {
                        self.sc.unread(next, next_literal);
                        let value = KdlValue::string(string, annotation.as_deref())?;
                        if skip {
                            skip = false;
                            annotation = None;
                        } else {
                            node.args.push(KdlArg::new(value, annotation.take()));
                        }
                    }
                }
                Token::CBrackOpen => {
                    if annotation.is_some() {
                        return Err(KdlError::UnexpectedTypeAnnotation);
                    }
                    trace!("entering child scope");
                    let children = self.parse_scope(true)?;
                    if skip {
                        skip = false;
                    } else {
                        node.children.extend(children);
                    }
                }
                Token::CBrackClose => {
                    if skip {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    // The enclosing scope consumes the brace.
                    self.sc.unread(token, literal);
                    break;
                }
                Token::ParenOpen => {
                    if annotation.is_some() {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    annotation = Some(self.scan_type_annotation()?);
                }
                _ => {
                    // Keyword literal, or the start of a property name.
                    let word = format!("{literal}{}", self.sc.scan_letters().1);
                    if let Some(value) = keyword_value(&word) {
                        if annotation.is_some() {
                            return Err(KdlError::UnexpectedTypeAnnotation);
                        }
                        if skip {
                            skip = false;
                        } else {
                            node.args.push(KdlArg::new(value, None));
                        }
                        continue;
                    }
                    if !is_initial_ident_token(token) {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    let prop_name = format!("{word}{}", self.sc.scan_bare_ident());
                    let (next, _) = self.sc.scan();
                    if next != Token::Equal {
                        return Err(KdlError::MissingEquals(prop_name));
                    }
                    let prop = self.scan_prop(prop_name, annotation.take())?;
                    if skip {
                        skip = false;
                    } else {
                        node.props.push(prop);
                    }
                }
            }
        }
        Ok(node)
    }

    /// Reads a property value; the `=` has already been consumed. Horizontal
    /// whitespace may separate it from the value, and the value may carry its
    /// own `(tag)` annotation. Bare identifiers are never valid here; only
    /// numbers, strings, and the keyword literals are.
    fn scan_prop(&mut self, name: String, ty: Option<String>) -> Result<KdlProp, KdlError> {
        trace!(name = %name, "scanning property");
        let mut value_ty: Option<String> = None;
        loop {
            let (token, literal) = self.sc.scan();
            match token {
                Token::Eof => return Err(KdlError::UnexpectedEof),
                Token::Ws => {
                    if literal.chars().any(is_newline) {
                        return Err(KdlError::InvalidPropertyValue);
                    }
                }
                Token::ParenOpen => {
                    if value_ty.is_some() {
                        return Err(KdlError::UnexpectedToken(literal));
                    }
                    value_ty = Some(self.scan_type_annotation()?);
                }
                Token::NumInt => {
                    let value = KdlValue::integer(&literal, value_ty.as_deref())?;
                    return Ok(KdlProp::new(name, ty, value, value_ty));
                }
                Token::NumFloat | Token::NumSci => {
                    let value = KdlValue::float(&literal, value_ty.as_deref())?;
                    return Ok(KdlProp::new(name, ty, value, value_ty));
                }
                Token::Invalid => return Err(KdlError::InvalidNumber(literal)),
                Token::Quote | Token::RawStrOpen | Token::RawStrHashOpen
                | Token::RawStrHashClose => {
                    let string = self.scan_string_body(token, &literal)?;
                    let value = KdlValue::string(string, value_ty.as_deref())?;
                    return Ok(KdlProp::new(name, ty, value, value_ty));
                }
                _ => {
                    let word = format!("{literal}{}", self.sc.scan_letters().1);
                    return match keyword_value(&word) {
                        Some(value) => {
                            if value_ty.is_some() {
                                return Err(KdlError::UnexpectedTypeAnnotation);
                            }
                            Ok(KdlProp::new(name, ty, value, None))
                        }
                        None => Err(KdlError::InvalidPropertyValue),
                    };
                }
            }
        }
    }

    /// Dispatches a string-opener token to the right body reader. A stray
    /// `"#…` closer in value position is a quoted string whose body happens
    /// to start with hashes; the hashes come from the token literal.
    fn scan_string_body(&mut self, opener: Token, literal: &str) -> Result<String, KdlError> {
        match opener {
            Token::Quote => self.scan_string(),
            Token::RawStrOpen => self.scan_raw_string(0),
            Token::RawStrHashOpen => self.scan_raw_string(hash_count(literal)),
            _ => {
                let mut string = literal[1..].to_string();
                string.push_str(&self.scan_string()?);
                Ok(string)
            }
        }
    }

    /// Quoted string body: escapes are processed, raw newlines are kept
    /// verbatim, EOF before the closing quote is an error.
    fn scan_string(&mut self) -> Result<String, KdlError> {
        let mut value = String::new();
        loop {
            let Some(ch) = self.sc.read() else {
                return Err(KdlError::UnterminatedString);
            };
            match ch {
                '"' => break,
                '\\' => value.push(self.scan_escape()?),
                _ => value.push(ch),
            }
        }
        Ok(value)
    }

    fn scan_escape(&mut self) -> Result<char, KdlError> {
        let Some(esc) = self.sc.read() else {
            return Err(KdlError::UnterminatedString);
        };
        Ok(match esc {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\\' => '\\',
            '/' => '/',
            '"' => '"',
            'b' => '\u{0008}',
            'f' => '\u{000C}',
            'u' => return self.scan_unicode_escape(),
            other => return Err(KdlError::InvalidEscape(other.to_string())),
        })
    }

    fn scan_unicode_escape(&mut self) -> Result<char, KdlError> {
        if self.sc.read() != Some('{') {
            return Err(KdlError::InvalidEscape("u".into()));
        }
        let digits = self.sc.scan_while(|c| c.is_ascii_hexdigit());
        if self.sc.read() != Some('}') || digits.is_empty() || digits.len() > 6 {
            return Err(KdlError::InvalidEscape(format!("u{{{digits}")));
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| KdlError::InvalidEscape(format!("u{{{digits}}}")))
    }

    /// Raw string body: no escape processing. The terminator is a quote
    /// followed by exactly `hashes` hash runes; anything short of that is
    /// literal content.
    fn scan_raw_string(&mut self, hashes: usize) -> Result<String, KdlError> {
        let mut value = String::new();
        loop {
            let Some(ch) = self.sc.read() else {
                return Err(KdlError::UnterminatedString);
            };
            if ch != '"' {
                value.push(ch);
                continue;
            }
            let mut seen = 0;
            while seen < hashes && self.sc.peek() == Some('#') {
                self.sc.read();
                seen += 1;
            }
            if seen == hashes {
                break;
            }
            value.push('"');
            for _ in 0..seen {
                value.push('#');
            }
        }
        Ok(value)
    }

    /// `(tag)` body after the opening paren: Unicode letters and digits,
    /// closed by `)`. Empty tags are rejected.
    fn scan_type_annotation(&mut self) -> Result<String, KdlError> {
        let tag = self.sc.scan_while(char::is_alphanumeric);
        match self.sc.read() {
            Some(')') if !tag.is_empty() => Ok(tag),
            Some(')') => Err(KdlError::InvalidTypeAnnotation(tag)),
            _ => Err(KdlError::UnclosedTypeAnnotation),
        }
    }

    /// Consumes through the first `*/`. Multi-line comments do not nest.
    fn scan_multiline_comment(&mut self) -> Result<(), KdlError> {
        loop {
            match self.sc.scan().0 {
                Token::Eof => return Err(KdlError::UnterminatedComment),
                Token::CommentMulClose => return Ok(()),
                _ => {}
            }
        }
    }
}

fn guard_name(name: String) -> Result<String, KdlError> {
    if name.is_empty() {
        Err(KdlError::EmptyNodeName)
    } else {
        Ok(name)
    }
}

fn keyword_value(word: &str) -> Option<KdlValue> {
    match word {
        "null" => Some(KdlValue::Null),
        "true" => Some(KdlValue::Bool(true)),
        "false" => Some(KdlValue::Bool(false)),
        _ => None,
    }
}

fn hash_count(literal: &str) -> usize {
    literal.matches('#').count()
}
