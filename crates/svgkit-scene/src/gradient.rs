//! Paint server definitions.

use crate::color::Color;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};

/// How a gradient fills beyond its end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

impl SpreadMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pad" => Some(SpreadMethod::Pad),
            "reflect" => Some(SpreadMethod::Reflect),
            "repeat" => Some(SpreadMethod::Repeat),
            _ => None,
        }
    }
}

/// Coordinate system of gradient end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientUnits {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl GradientUnits {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "userSpaceOnUse" => Some(GradientUnits::UserSpaceOnUse),
            "objectBoundingBox" => Some(GradientUnits::ObjectBoundingBox),
            _ => None,
        }
    }
}

/// A color stop. Offsets within one gradient are non-decreasing and in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    /// Stop color with `stop-opacity` folded into alpha.
    pub color: Color,
}

/// A `linearGradient` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub id: String,
    pub x1: Option<f32>,
    pub y1: Option<f32>,
    pub x2: Option<f32>,
    pub y2: Option<f32>,
    pub spread_method: SpreadMethod,
    pub units: Option<GradientUnits>,
    pub transform: Option<Transform2D>,
    pub stops: Vec<GradientStop>,
}

/// A resource referenced by id from style attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    LinearGradient(LinearGradient),
}

impl Definition {
    pub fn id(&self) -> &str {
        match self {
            Definition::LinearGradient(g) => &g.id,
        }
    }
}

/// Clamp raw stop offsets to 0..=1 and make them non-decreasing.
pub fn normalize_offsets(offsets: &mut [f32]) {
    let mut floor = 0.0_f32;
    for offset in offsets.iter_mut() {
        let clamped = offset.clamp(0.0, 1.0).max(floor);
        *offset = clamped;
        floor = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_method() {
        assert_eq!(SpreadMethod::parse("reflect"), Some(SpreadMethod::Reflect));
        assert_eq!(SpreadMethod::parse("mirror"), None);
        assert_eq!(SpreadMethod::default(), SpreadMethod::Pad);
    }

    #[test]
    fn test_gradient_units() {
        assert_eq!(
            GradientUnits::parse("userSpaceOnUse"),
            Some(GradientUnits::UserSpaceOnUse)
        );
        assert_eq!(GradientUnits::parse("objectboundingbox"), None);
    }

    #[test]
    fn test_normalize_offsets() {
        let mut offsets = [-0.5, 0.4, 0.2, 1.5];
        normalize_offsets(&mut offsets);
        assert_eq!(offsets, [0.0, 0.4, 0.4, 1.0]);
    }
}
