//! Render-time style resolution and scene traversal.
//!
//! The scene keeps style attributes exactly as written. Consumers call into
//! this module to inherit them down the tree, apply defaults and resolve
//! `url(#id)` paint references against the document's definitions.

use crate::color::Color;
use crate::document::{SceneDocument, SceneElement, SvgCircle, SvgGroup, SvgPath, SvgRect};
use crate::gradient::{Definition, GradientStop, GradientUnits, SpreadMethod};
use crate::style::{FillRule, GraphicsStyle, LineCap, LineJoin, Paint};
use crate::transform::Transform2D;
use serde::Serialize;
use svgkit_path::Point;
use thiserror::Error;

/// A paint reference that names no definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no definition with id #{id}")]
pub struct GradientResolutionError {
    pub id: String,
}

/// Definitions addressable by id.
pub trait DefinitionLookup {
    fn definition(&self, id: &str) -> Option<&Definition>;
}

impl DefinitionLookup for [Definition] {
    fn definition(&self, id: &str) -> Option<&Definition> {
        self.iter().find(|d| d.id() == id)
    }
}

impl DefinitionLookup for SceneDocument {
    fn definition(&self, id: &str) -> Option<&Definition> {
        self.definitions.as_slice().definition(id)
    }
}

/// Style in effect at a node, with inherited values and defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedStyle {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub stroke_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub fill_rule: FillRule,
    pub clip_rule: FillRule,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            fill_rule: FillRule::NonZero,
            clip_rule: FillRule::NonZero,
        }
    }
}

impl ResolvedStyle {
    /// Child style: values set on `style` override the inherited ones.
    pub fn merge(&self, style: &GraphicsStyle) -> ResolvedStyle {
        ResolvedStyle {
            fill: style.fill.clone().or_else(|| self.fill.clone()),
            stroke: style.stroke.clone().or_else(|| self.stroke.clone()),
            stroke_width: style.stroke_width.unwrap_or(self.stroke_width),
            line_cap: style.stroke_line_cap.unwrap_or(self.line_cap),
            line_join: style.stroke_line_join.unwrap_or(self.line_join),
            fill_rule: style.fill_rule.unwrap_or(self.fill_rule),
            clip_rule: style.clip_rule.unwrap_or(self.clip_rule),
        }
    }
}

/// A linear gradient with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
    pub spread_method: SpreadMethod,
    pub units: GradientUnits,
    pub transform: Transform2D,
}

/// Paint ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedPaint {
    Color(Color),
    LinearGradient(ResolvedLinearGradient),
}

/// Resolve `paint` against `lookup`.
///
/// Unset gradient end points default to a horizontal line from `(0, 0)` to
/// `(viewport_width, 0)`.
pub fn resolve_paint<L: DefinitionLookup + ?Sized>(
    paint: &Paint,
    lookup: &L,
    viewport_width: f32,
) -> Result<ResolvedPaint, GradientResolutionError> {
    let id = match paint {
        Paint::Color(color) => return Ok(ResolvedPaint::Color(*color)),
        Paint::Reference(id) => id,
    };
    let definition = lookup
        .definition(id)
        .ok_or_else(|| GradientResolutionError { id: id.clone() })?;

    match definition {
        Definition::LinearGradient(g) => Ok(ResolvedPaint::LinearGradient(ResolvedLinearGradient {
            start: Point::new(g.x1.unwrap_or(0.0), g.y1.unwrap_or(0.0)),
            end: Point::new(g.x2.unwrap_or(viewport_width), g.y2.unwrap_or(0.0)),
            stops: g.stops.clone(),
            spread_method: g.spread_method,
            units: g.units.unwrap_or(GradientUnits::UserSpaceOnUse),
            transform: g.transform.unwrap_or_default(),
        })),
    }
}

/// Callbacks for [`SceneDocument::visit`].
///
/// Leaf callbacks receive the accumulated transform from the document root
/// and the style in effect.
pub trait SceneVisitor {
    fn enter_group(&mut self, _group: &SvgGroup, _transform: &Transform2D, _style: &ResolvedStyle) {}
    fn leave_group(&mut self, _group: &SvgGroup) {}
    fn visit_path(&mut self, _path: &SvgPath, _transform: &Transform2D, _style: &ResolvedStyle) {}
    fn visit_rect(&mut self, _rect: &SvgRect, _transform: &Transform2D, _style: &ResolvedStyle) {}
    fn visit_circle(&mut self, _circle: &SvgCircle, _transform: &Transform2D, _style: &ResolvedStyle) {}
}

impl SceneDocument {
    /// Walk the tree depth first in document order.
    pub fn visit<V: SceneVisitor + ?Sized>(&self, visitor: &mut V) {
        walk(
            &self.children,
            &Transform2D::IDENTITY,
            &ResolvedStyle::default(),
            visitor,
        );
    }
}

fn walk<V: SceneVisitor + ?Sized>(
    elements: &[SceneElement],
    transform: &Transform2D,
    inherited: &ResolvedStyle,
    visitor: &mut V,
) {
    struct Frame<'d> {
        rest: std::slice::Iter<'d, SceneElement>,
        group: Option<&'d SvgGroup>,
        transform: Transform2D,
        style: ResolvedStyle,
    }

    let mut stack = vec![Frame {
        rest: elements.iter(),
        group: None,
        transform: *transform,
        style: inherited.clone(),
    }];

    while let Some(frame) = stack.last_mut() {
        let Some(element) = frame.rest.next() else {
            if let Some(group) = stack.pop().and_then(|f| f.group) {
                visitor.leave_group(group);
            }
            continue;
        };
        let style = frame.style.merge(element.style());
        let transform = frame.transform;
        match element {
            SceneElement::Group(group) => {
                let transform = transform.multiply(&group.transform);
                visitor.enter_group(group, &transform, &style);
                stack.push(Frame {
                    rest: group.children.iter(),
                    group: Some(group),
                    transform,
                    style,
                });
            }
            SceneElement::Path(path) => visitor.visit_path(path, &transform, &style),
            SceneElement::Rect(rect) => visitor.visit_rect(rect, &transform, &style),
            SceneElement::Circle(circle) => visitor.visit_circle(circle, &transform, &style),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::LinearGradient;

    fn gradient(id: &str) -> Definition {
        Definition::LinearGradient(LinearGradient {
            id: id.to_string(),
            x1: None,
            y1: None,
            x2: None,
            y2: Some(10.0),
            spread_method: SpreadMethod::Repeat,
            units: None,
            transform: None,
            stops: vec![GradientStop {
                offset: 0.0,
                color: Color::WHITE,
            }],
        })
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let parent = ResolvedStyle::default().merge(&GraphicsStyle {
            fill: Some(Paint::Color(Color::BLACK)),
            stroke_width: Some(3.0),
            ..Default::default()
        });
        let child = parent.merge(&GraphicsStyle {
            stroke_width: Some(0.5),
            stroke_line_join: Some(LineJoin::Round),
            ..Default::default()
        });
        assert_eq!(child.fill, Some(Paint::Color(Color::BLACK)));
        assert_eq!(child.stroke, None);
        assert_eq!(child.stroke_width, 0.5);
        assert_eq!(child.line_join, LineJoin::Round);
        assert_eq!(child.line_cap, LineCap::Butt);
        assert_eq!(child.fill_rule, FillRule::NonZero);
    }

    #[test]
    fn test_resolve_color() {
        let defs: Vec<Definition> = Vec::new();
        let paint = Paint::Color(Color::WHITE);
        assert_eq!(
            resolve_paint(&paint, defs.as_slice(), 100.0),
            Ok(ResolvedPaint::Color(Color::WHITE))
        );
    }

    #[test]
    fn test_resolve_gradient_defaults() {
        let defs = vec![gradient("a"), gradient("b")];
        let resolved = resolve_paint(&Paint::Reference("b".to_string()), defs.as_slice(), 64.0).unwrap();
        match resolved {
            ResolvedPaint::LinearGradient(g) => {
                assert_eq!(g.start, Point::new(0.0, 0.0));
                assert_eq!(g.end, Point::new(64.0, 10.0));
                assert_eq!(g.spread_method, SpreadMethod::Repeat);
                assert_eq!(g.units, GradientUnits::UserSpaceOnUse);
                assert!(g.transform.is_identity());
                assert_eq!(g.stops.len(), 1);
            }
            other => panic!("expected gradient, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_reference() {
        let defs = vec![gradient("a")];
        let err = resolve_paint(&Paint::Reference("missing".to_string()), defs.as_slice(), 0.0)
            .unwrap_err();
        assert_eq!(err.id, "missing");
        assert_eq!(err.to_string(), "no definition with id #missing");
    }
}
