//! Error types for scene conversion.

use crate::color::ColorFormatError;
use crate::resolve::GradientResolutionError;
use crate::transform::TransformSyntaxError;
use svgkit_markup::{LexError, MarkupError, ParseError};
use svgkit_path::PathSyntaxError;
use thiserror::Error;

/// The tag tree is well formed but does not describe a supported document.
///
/// Offsets point at the `<` of the offending tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("document root is a {kind}, not a tag")]
    RootNotATag { kind: &'static str },

    #[error("root element is <{found}>, expected <svg> (offset {offset})")]
    WrongRoot { found: String, offset: usize },

    #[error("root xmlns is {found:?}, expected \"{expected}\" (offset {offset})")]
    WrongNamespace {
        found: Option<String>,
        expected: &'static str,
        offset: usize,
    },

    #[error("unknown tag <{name}> (offset {offset})")]
    UnknownTag { name: String, offset: usize },

    #[error("unknown attribute {attribute:?} on <{tag}> (offset {offset})")]
    UnknownAttribute {
        tag: String,
        attribute: String,
        offset: usize,
    },

    #[error("<{tag}> requires attribute {attribute:?} (offset {offset})")]
    MissingAttribute {
        tag: String,
        attribute: &'static str,
        offset: usize,
    },

    #[error("invalid value {value:?} for {attribute:?} on <{tag}> (offset {offset})")]
    InvalidValue {
        tag: String,
        attribute: String,
        value: String,
        offset: usize,
    },
}

impl SemanticError {
    pub fn offset(&self) -> Option<usize> {
        match self {
            SemanticError::RootNotATag { .. } => None,
            SemanticError::WrongRoot { offset, .. }
            | SemanticError::WrongNamespace { offset, .. }
            | SemanticError::UnknownTag { offset, .. }
            | SemanticError::UnknownAttribute { offset, .. }
            | SemanticError::MissingAttribute { offset, .. }
            | SemanticError::InvalidValue { offset, .. } => Some(*offset),
        }
    }
}

/// Unified error for the whole pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("Color error: {0}")]
    Color(#[from] ColorFormatError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformSyntaxError),

    #[error("Path error: {0}")]
    Path(#[from] PathSyntaxError),

    #[error("Gradient error: {0}")]
    Gradient(#[from] GradientResolutionError),
}

impl From<MarkupError> for SvgError {
    fn from(err: MarkupError) -> Self {
        match err {
            MarkupError::Lex(e) => SvgError::Lex(e),
            MarkupError::Parse(e) => SvgError::Parse(e),
        }
    }
}

impl SvgError {
    /// Get the error category for reporting.
    pub fn category(&self) -> &'static str {
        match self {
            SvgError::Lex(_) => "lex",
            SvgError::Parse(_) => "parse",
            SvgError::Semantic(_) => "semantic",
            SvgError::Color(_) => "color",
            SvgError::Transform(_) => "transform",
            SvgError::Path(_) => "path",
            SvgError::Gradient(_) => "gradient",
        }
    }
}

/// Result type alias for svgkit operations.
pub type SvgResult<T> = Result<T, SvgError>;
