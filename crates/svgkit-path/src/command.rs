//! Path command model.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point in user units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Mirror `self` through `center`.
    pub fn reflect_through(self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

/// One compiled path command.
///
/// Coordinates are absolute or relative to the current point depending on
/// `relative`; the current point itself is tracked by the consumer (see
/// [`crate::resolve_path`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo {
        x: f32,
        y: f32,
        relative: bool,
    },
    /// Straight line. An unset axis keeps the current point's value on that
    /// axis, which is how `H` and `V` are encoded.
    LineTo {
        x: Option<f32>,
        y: Option<f32>,
        relative: bool,
    },
    /// Cubic bezier. An unset first control point comes from `S` and is
    /// reflected from the previous cubic.
    CurveTo {
        c1: Option<Point>,
        c2: Point,
        end: Point,
        relative: bool,
    },
    /// Quadratic bezier. An unset control point comes from `T`.
    QuadTo {
        c1: Option<Point>,
        end: Point,
        relative: bool,
    },
    ArcTo {
        rx: f32,
        ry: f32,
        /// X-axis rotation in degrees.
        rotation: f32,
        large_arc: bool,
        sweep: bool,
        x: f32,
        y: f32,
        relative: bool,
    },
    Close,
}

impl PathCommand {
    pub fn move_to(x: f32, y: f32) -> Self {
        PathCommand::MoveTo {
            x,
            y,
            relative: false,
        }
    }

    pub fn line_to(x: f32, y: f32) -> Self {
        PathCommand::LineTo {
            x: Some(x),
            y: Some(y),
            relative: false,
        }
    }

    /// Absolute arc with zero rotation.
    pub fn arc_to(rx: f32, ry: f32, large_arc: bool, sweep: bool, x: f32, y: f32) -> Self {
        PathCommand::ArcTo {
            rx,
            ry,
            rotation: 0.0,
            large_arc,
            sweep,
            x,
            y,
            relative: false,
        }
    }

    pub fn is_relative(&self) -> bool {
        match *self {
            PathCommand::MoveTo { relative, .. }
            | PathCommand::LineTo { relative, .. }
            | PathCommand::CurveTo { relative, .. }
            | PathCommand::QuadTo { relative, .. }
            | PathCommand::ArcTo { relative, .. } => relative,
            PathCommand::Close => false,
        }
    }
}
