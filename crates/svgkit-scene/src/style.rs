//! Presentation attributes.

use crate::color::{parse_color, Color, ColorFormatError};
use serde::{Deserialize, Serialize};

/// A `fill` or `stroke` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    Color(Color),
    /// `url(#id)`: a definition resolved at render time.
    Reference(String),
}

impl Paint {
    /// Parse a paint value. `none` yields `Ok(None)`.
    pub fn parse(value: &str) -> Result<Option<Paint>, ColorFormatError> {
        let value = value.trim();
        if value == "none" {
            return Ok(None);
        }
        if let Some(inner) = value.strip_prefix("url(") {
            let id = inner
                .strip_suffix(')')
                .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\''))
                .and_then(|s| s.strip_prefix('#'))
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ColorFormatError::InvalidReference(value.to_string()))?;
            return Ok(Some(Paint::Reference(id.to_string())));
        }
        parse_color(value).map(|c| Some(Paint::Color(c)))
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Paint::Color(c) => Some(*c),
            Paint::Reference(_) => None,
        }
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

/// Line join style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "miter" => Some(LineJoin::Miter),
            "round" => Some(LineJoin::Round),
            "bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

/// Fill rule, also used for `clip-rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "nonzero" => Some(FillRule::NonZero),
            "evenodd" => Some(FillRule::EvenOdd),
            _ => None,
        }
    }
}

/// Style attributes as written on one element.
///
/// `None` means "inherit": nothing is defaulted at parse time. See
/// [`crate::ResolvedStyle`] for render-time values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphicsStyle {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<f32>,
    pub stroke_line_cap: Option<LineCap>,
    pub stroke_line_join: Option<LineJoin>,
    pub fill_rule: Option<FillRule>,
    pub clip_rule: Option<FillRule>,
}

impl GraphicsStyle {
    /// Attribute names that feed a [`GraphicsStyle`].
    pub const ATTRIBUTES: &'static [&'static str] = &[
        "stroke",
        "stroke-width",
        "stroke-linecap",
        "stroke-linejoin",
        "fill",
        "fill-rule",
        "clip-rule",
    ];

    pub fn is_empty(&self) -> bool {
        *self == GraphicsStyle::default()
    }
}
