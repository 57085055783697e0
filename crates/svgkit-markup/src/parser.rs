//! Structural parser.
//!
//! Descent over the token list produced by the tokenizer. Each call to
//! [`ParserState::parse_next_element`] consumes one element; when it meets a
//! closing tag it rewinds over `</` and returns `None` so the caller can match
//! the closing tag against the tag it has open. Open tags are kept on a heap
//! stack bounded by [`ParserConfig::max_depth`].

use crate::tokenizer::{Token, TokenKind};
use std::fmt;
use svgkit_common::excerpt;
use thiserror::Error;
use tracing::trace;

/// Default nesting limit for [`ParserConfig`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Ceiling for any configured nesting limit. Parsing itself does not recurse,
/// but dropping, printing and serializing a tree do.
pub const MAX_DEPTH_CEILING: usize = 1024;

/// Errors produced by the structural parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at offset {offset}: {excerpt}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        offset: usize,
        excerpt: String,
    },

    #[error("closing tag </{closing}> does not match <{opening}> at offset {offset}: {excerpt}")]
    MismatchedClosingTag {
        opening: String,
        closing: String,
        offset: usize,
        excerpt: String,
    },

    #[error("unexpected end of input at offset {offset} while {context}")]
    UnexpectedEof { offset: usize, context: &'static str },

    #[error("elements nested deeper than {limit} levels at offset {offset}")]
    TooDeep { limit: usize, offset: usize },
}

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum element nesting depth, capped at [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Attributes of a tag, kept in order of first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute. A repeated name keeps its original position and
    /// takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

/// A tag with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTag {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<ParsedElement>,
    /// Byte offset of the opening `<`.
    pub offset: usize,
}

impl ParsedTag {
    /// Child tags, skipping comments and text.
    pub fn child_tags(&self) -> impl Iterator<Item = &ParsedTag> {
        self.children.iter().filter_map(ParsedElement::as_tag)
    }
}

/// Uninterpreted markup tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedElement {
    Tag(ParsedTag),
    /// Comment body without the `<!--` and `-->` delimiters.
    Comment(String),
    /// Character data, verbatim.
    Text(String),
}

impl ParsedElement {
    pub fn as_tag(&self) -> Option<&ParsedTag> {
        match self {
            ParsedElement::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        match self {
            ParsedElement::Tag(tag) => {
                write!(f, "{:indent$}<{}", "", tag.name, indent = indent)?;
                for (name, value) in tag.attributes.iter() {
                    write!(f, " {}=\"{}\"", name, value)?;
                }
                if tag.children.is_empty() {
                    return writeln!(f, "/>");
                }
                writeln!(f, ">")?;
                for child in &tag.children {
                    child.write_indented(f, indent + 2)?;
                }
                writeln!(f, "{:indent$}</{}>", "", tag.name, indent = indent)
            }
            ParsedElement::Comment(text) => {
                writeln!(f, "{:indent$}<!--{}-->", "", text, indent = indent)
            }
            ParsedElement::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    Ok(())
                } else {
                    writeln!(f, "{:indent$}{}", "", text, indent = indent)
                }
            }
        }
    }
}

impl fmt::Display for ParsedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// One step of the element grammar.
enum Item {
    /// A comment, a text run or a self-closing tag.
    Complete(ParsedElement),
    /// An opening tag whose children follow.
    Open(ParsedTag),
    /// The cursor is back on the `<` of a closing tag.
    Closing,
}

/// Cursor over a token list.
pub struct ParserState<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
    config: ParserConfig,
}

impl<'a> ParserState<'a> {
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            tokens,
            source,
            pos: 0,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = ParserConfig {
            max_depth: config.max_depth.min(MAX_DEPTH_CEILING),
        };
        self
    }

    /// Index of the next token to be consumed.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume the next token.
    pub fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).copied()?;
        self.pos += 1;
        Some(token)
    }

    /// Look at the next token without consuming it.
    pub fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    /// Step back over the most recently consumed token.
    pub fn rewind(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Consume the next token, failing on end of input.
    fn advance(&mut self, context: &'static str) -> Result<Token, ParseError> {
        match self.next() {
            Some(token) if token.kind != TokenKind::Eof => Ok(token),
            Some(token) => Err(ParseError::UnexpectedEof {
                offset: token.start,
                context,
            }),
            None => Err(ParseError::UnexpectedEof {
                offset: self.source.len(),
                context,
            }),
        }
    }

    /// Consume the next token and require it to be of `kind`.
    pub fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ParseError> {
        let token = self.advance(expected)?;
        if token.kind != kind {
            return Err(self.unexpected(token, expected));
        }
        Ok(token)
    }

    fn unexpected(&self, token: Token, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            expected,
            found: token.kind,
            offset: token.start,
            excerpt: excerpt(self.source, token.start),
        }
    }

    /// Parse one element. Returns `None`, with the cursor back on the `<`, when
    /// the next tokens start a closing tag.
    ///
    /// Nested tags are tracked on an explicit stack of open tags, so nesting
    /// depth costs heap space rather than call stack.
    pub fn parse_next_element(&mut self) -> Result<Option<ParsedElement>, ParseError> {
        let mut current = match self.read_item()? {
            Item::Complete(element) => return Ok(Some(element)),
            Item::Closing => return Ok(None),
            Item::Open(tag) => tag,
        };
        self.check_depth(0, &current)?;
        let mut ancestors: Vec<ParsedTag> = Vec::new();

        loop {
            match self.read_item()? {
                Item::Complete(element) => current.children.push(element),
                Item::Open(tag) => {
                    self.check_depth(ancestors.len() + 1, &tag)?;
                    ancestors.push(std::mem::replace(&mut current, tag));
                }
                Item::Closing => {
                    self.close_tag(&current)?;
                    match ancestors.pop() {
                        Some(parent) => {
                            let finished = std::mem::replace(&mut current, parent);
                            current.children.push(ParsedElement::Tag(finished));
                        }
                        None => return Ok(Some(ParsedElement::Tag(current))),
                    }
                }
            }
        }
    }

    /// Read a comment, a text run, a self-closing tag or an opening tag.
    fn read_item(&mut self) -> Result<Item, ParseError> {
        let opening = self.advance("reading an element")?;
        match opening.kind {
            TokenKind::Comment => {
                let text = &self.source[opening.start + 4..opening.end - 3];
                Ok(Item::Complete(ParsedElement::Comment(text.to_string())))
            }
            TokenKind::Text => Ok(Item::Complete(ParsedElement::Text(
                opening.text(self.source).to_string(),
            ))),
            TokenKind::AngleOpen => {
                let token = self.advance("reading a tag name")?;
                match token.kind {
                    TokenKind::Slash => {
                        self.rewind();
                        self.rewind();
                        Ok(Item::Closing)
                    }
                    TokenKind::Identifier => self.read_tag(opening, token),
                    _ => Err(self.unexpected(token, "a tag name or '/'")),
                }
            }
            _ => Err(self.unexpected(opening, "'<', a comment or text")),
        }
    }

    fn read_tag(&mut self, opening: Token, name_token: Token) -> Result<Item, ParseError> {
        let name = name_token.text(self.source).to_string();
        let mut attributes = Attributes::new();

        loop {
            let token = self.advance("reading tag attributes")?;
            match token.kind {
                TokenKind::AngleClose => break,
                TokenKind::Identifier => {
                    let key = token.text(self.source);
                    self.expect(TokenKind::Equals, "'='")?;
                    let value = self.expect(TokenKind::StringLiteral, "a quoted attribute value")?;
                    attributes.insert(key, &self.source[value.start + 1..value.end - 1]);
                }
                TokenKind::Slash => {
                    self.expect(TokenKind::AngleClose, "'>'")?;
                    trace!(tag = %name, attrs = attributes.len(), "Parsed empty tag");
                    return Ok(Item::Complete(ParsedElement::Tag(ParsedTag {
                        name,
                        attributes,
                        children: Vec::new(),
                        offset: opening.start,
                    })));
                }
                _ => return Err(self.unexpected(token, "an attribute name, '/>' or '>'")),
            }
        }

        Ok(Item::Open(ParsedTag {
            name,
            attributes,
            children: Vec::new(),
            offset: opening.start,
        }))
    }

    /// `depth` is the number of tags already open around `tag`.
    fn check_depth(&self, depth: usize, tag: &ParsedTag) -> Result<(), ParseError> {
        if depth >= self.config.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.config.max_depth,
                offset: tag.offset,
            });
        }
        trace!(tag = %tag.name, depth, "Opened tag");
        Ok(())
    }

    /// Consume `</name>` for the open `tag`.
    fn close_tag(&mut self, tag: &ParsedTag) -> Result<(), ParseError> {
        self.expect(TokenKind::AngleOpen, "'<'")?;
        self.expect(TokenKind::Slash, "'/'")?;
        let closing = self.expect(TokenKind::Identifier, "a closing tag name")?;
        let closing_name = closing.text(self.source);
        if closing_name != tag.name {
            return Err(ParseError::MismatchedClosingTag {
                opening: tag.name.clone(),
                closing: closing_name.to_string(),
                offset: closing.start,
                excerpt: excerpt(self.source, closing.start),
            });
        }
        self.expect(TokenKind::AngleClose, "'>'")?;
        trace!(tag = %tag.name, children = tag.children.len(), "Closed tag");
        Ok(())
    }

    fn skip_blank_text(&mut self) {
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Text || !token.text(self.source).trim().is_empty() {
                break;
            }
            self.pos += 1;
        }
    }

    /// Parse the document's single root element.
    ///
    /// Whitespace-only text around the root is skipped. A root tag must be
    /// followed only by such whitespace and the end of input. A comment or
    /// non-blank text in root position is returned as-is for the caller to
    /// reject.
    pub fn parse_root(&mut self) -> Result<ParsedElement, ParseError> {
        self.skip_blank_text();
        let root = match self.parse_next_element()? {
            Some(root) => root,
            None => {
                // Cursor sits on the `<` of a stray closing tag.
                self.next();
                let slash = self.advance("reading the root element")?;
                return Err(self.unexpected(slash, "an opening tag"));
            }
        };

        if matches!(root, ParsedElement::Tag(_)) {
            self.skip_blank_text();
            if let Some(token) = self.next() {
                if token.kind != TokenKind::Eof {
                    return Err(self.unexpected(token, "end of input after the root element"));
                }
            }
        }
        Ok(root)
    }
}
