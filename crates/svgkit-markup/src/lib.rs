//! # svgkit markup
//!
//! Tokenizer and structural parser for the SVG markup subset.
//!
//! The tokenizer turns source text into byte-range tokens; the parser builds
//! an uninterpreted tree of tags, comments and text from them. Nothing here
//! knows what an SVG element means: that is the scene converter's job.
//!
//! ```
//! use svgkit_markup::{parse_document, ParsedElement, ParserConfig};
//!
//! let root = parse_document("<svg><g/></svg>", &ParserConfig::default()).unwrap();
//! match root {
//!     ParsedElement::Tag(tag) => assert_eq!(tag.children.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

pub mod parser;
pub mod tokenizer;

pub use parser::{
    Attributes, ParseError, ParsedElement, ParsedTag, ParserConfig, ParserState, DEFAULT_MAX_DEPTH,
    MAX_DEPTH_CEILING,
};
pub use tokenizer::{
    tokenize, tokenize_fragment, LexContext, LexError, LexErrorKind, Token, TokenKind, Tokenizer,
};

use thiserror::Error;

/// Failure in either markup stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl MarkupError {
    /// Byte offset the error points at.
    pub fn offset(&self) -> usize {
        match self {
            MarkupError::Lex(e) => e.offset,
            MarkupError::Parse(e) => match e {
                ParseError::UnexpectedToken { offset, .. }
                | ParseError::MismatchedClosingTag { offset, .. }
                | ParseError::UnexpectedEof { offset, .. }
                | ParseError::TooDeep { offset, .. } => *offset,
            },
        }
    }
}

/// Tokenize and parse a whole document into its root element.
pub fn parse_document(source: &str, config: &ParserConfig) -> Result<ParsedElement, MarkupError> {
    let tokens = tokenize(source)?;
    let root = ParserState::new(&tokens, source)
        .with_config(*config)
        .parse_root()?;
    Ok(root)
}
