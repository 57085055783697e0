//! # svgkit scene
//!
//! Converts SVG markup into a renderer-agnostic scene document.
//!
//! ## Features
//!
//! - **Pipeline entry point**: [`parse_svg`] runs tokenizer, parser and
//!   converter in one call
//! - **Elements**: `g`, `a`, `path`, `rect`, `circle`; `defs`, `mask` and
//!   `title` produce no element
//! - **Style**: fill, stroke and line attributes kept as written, resolved at
//!   render time through [`ResolvedStyle`]
//! - **Transforms**: `translate`, `scale`, `rotate` lists
//! - **Gradients**: `linearGradient` definitions referenced by `url(#id)`
//!
//! ## Architecture
//!
//! ```text
//! markup text
//!    └── svgkit-markup: tokens → tag tree
//!           └── convert: tag tree → SceneDocument
//!                  ├── svgkit-path: d → PathCommand list
//!                  └── color / transform / gradient parsing
//! ```
//!
//! ```
//! use svgkit_scene::{parse_svg, SceneElement};
//!
//! let doc = parse_svg(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
//!          <circle cx="5" cy="5" r="4" fill="red"/>
//!        </svg>"#,
//! )
//! .unwrap();
//! assert!(matches!(doc.children[0], SceneElement::Circle(_)));
//! ```

pub mod color;
pub mod config;
pub mod convert;
pub mod document;
pub mod error;
pub mod gradient;
pub mod resolve;
pub mod style;
pub mod transform;

pub use color::{parse_color, Color, ColorFormatError};
pub use config::SceneConfig;
pub use convert::{convert, convert_document, SVG_NAMESPACE};
pub use document::{SceneDocument, SceneElement, SvgCircle, SvgGroup, SvgPath, SvgRect, ViewBox};
pub use error::{SemanticError, SvgError, SvgResult};
pub use gradient::{Definition, GradientStop, GradientUnits, LinearGradient, SpreadMethod};
pub use resolve::{
    resolve_paint, DefinitionLookup, GradientResolutionError, ResolvedLinearGradient,
    ResolvedPaint, ResolvedStyle, SceneVisitor,
};
pub use style::{FillRule, GraphicsStyle, LineCap, LineJoin, Paint};
pub use transform::{Transform2D, TransformErrorKind, TransformSyntaxError};

use tracing::debug;

/// Parse SVG markup with the default (strict) configuration.
pub fn parse_svg(source: &str) -> SvgResult<SceneDocument> {
    parse_svg_with_config(source, &SceneConfig::default())
}

/// Parse SVG markup into a [`SceneDocument`].
pub fn parse_svg_with_config(source: &str, config: &SceneConfig) -> SvgResult<SceneDocument> {
    debug!(bytes = source.len(), "Parsing SVG");
    let root = svgkit_markup::parse_document(source, &config.parser_config())?;
    convert_document(&root, config)
}
