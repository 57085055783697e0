//! Scene document model.

use crate::gradient::Definition;
use crate::style::GraphicsStyle;
use crate::transform::Transform2D;
use serde::{Deserialize, Serialize};
use svgkit_path::PathCommand;

/// The `viewBox` rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

/// A converted SVG document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    pub view_box: Option<ViewBox>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub children: Vec<SceneElement>,
    pub definitions: Vec<Definition>,
}

impl SceneDocument {
    /// Viewport width: `width`, else the `viewBox` width.
    pub fn viewport_width(&self) -> Option<f32> {
        self.width.or(self.view_box.map(|vb| vb.width))
    }

    /// Viewport height: `height`, else the `viewBox` height.
    pub fn viewport_height(&self) -> Option<f32> {
        self.height.or(self.view_box.map(|vb| vb.height))
    }

    /// Number of elements in the tree, groups included.
    pub fn element_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self.children.as_slice()];
        while let Some(elements) = pending.pop() {
            count += elements.len();
            for element in elements {
                if let SceneElement::Group(g) = element {
                    pending.push(g.children.as_slice());
                }
            }
        }
        count
    }
}

/// A drawable element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum SceneElement {
    Group(SvgGroup),
    Path(SvgPath),
    Rect(SvgRect),
    Circle(SvgCircle),
}

impl SceneElement {
    pub fn id(&self) -> Option<&str> {
        match self {
            SceneElement::Group(e) => e.id.as_deref(),
            SceneElement::Path(e) => e.id.as_deref(),
            SceneElement::Rect(e) => e.id.as_deref(),
            SceneElement::Circle(e) => e.id.as_deref(),
        }
    }

    pub fn style(&self) -> &GraphicsStyle {
        match self {
            SceneElement::Group(e) => &e.style,
            SceneElement::Path(e) => &e.style,
            SceneElement::Rect(e) => &e.style,
            SceneElement::Circle(e) => &e.style,
        }
    }
}

/// `g` or `a`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SvgGroup {
    pub id: Option<String>,
    pub children: Vec<SceneElement>,
    pub transform: Transform2D,
    pub style: GraphicsStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgPath {
    pub id: Option<String>,
    pub commands: Vec<PathCommand>,
    pub style: GraphicsStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgRect {
    pub id: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rx: f32,
    pub ry: f32,
    pub style: GraphicsStyle,
}

impl SvgRect {
    /// Outline as path commands, clockwise from the end of the top-left
    /// corner. Corners are arcs only when both radii are positive; radii are
    /// clamped to half the width and height.
    pub fn to_path_commands(&self) -> Vec<PathCommand> {
        let (x, y, w, h) = (self.x, self.y, self.width, self.height);
        let rx = self.rx.min(w / 2.0).max(0.0);
        let ry = self.ry.min(h / 2.0).max(0.0);
        let rounded = rx > 0.0 && ry > 0.0;
        let (rx, ry) = if rounded { (rx, ry) } else { (0.0, 0.0) };

        let corner = |commands: &mut Vec<PathCommand>, to_x: f32, to_y: f32| {
            if rounded {
                commands.push(PathCommand::arc_to(rx, ry, false, true, to_x, to_y));
            }
        };

        let mut commands = Vec::with_capacity(10);
        commands.push(PathCommand::move_to(x + rx, y));
        commands.push(PathCommand::line_to(x + w - rx, y));
        corner(&mut commands, x + w, y + ry);
        commands.push(PathCommand::line_to(x + w, y + h - ry));
        corner(&mut commands, x + w - rx, y + h);
        commands.push(PathCommand::line_to(x + rx, y + h));
        corner(&mut commands, x, y + h - ry);
        commands.push(PathCommand::line_to(x, y + ry));
        corner(&mut commands, x + rx, y);
        commands.push(PathCommand::Close);
        commands
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgCircle {
    pub id: Option<String>,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub style: GraphicsStyle,
}

impl SvgCircle {
    /// Outline as two half-circle arcs. Empty when `r` is not positive.
    pub fn to_path_commands(&self) -> Vec<PathCommand> {
        if self.r <= 0.0 {
            return Vec::new();
        }
        let (cx, cy, r) = (self.cx, self.cy, self.r);
        vec![
            PathCommand::move_to(cx + r, cy),
            PathCommand::arc_to(r, r, true, true, cx - r, cy),
            PathCommand::arc_to(r, r, true, true, cx + r, cy),
            PathCommand::Close,
        ]
    }
}
