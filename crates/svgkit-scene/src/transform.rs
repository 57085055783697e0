//! 2D affine transforms and the `transform` attribute grammar.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use svgkit_common::excerpt;
use svgkit_path::number::{scan_number, skip_comma_whitespace, skip_whitespace};
use svgkit_path::Point;
use thiserror::Error;

/// 2D affine transformation matrix.
///
/// ```text
/// [a c e]
/// [b d f]
/// [0 0 1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// `self` followed by a translation in the local coordinate system.
    pub fn translate(self, tx: f32, ty: f32) -> Self {
        self.multiply(&Transform2D {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        })
    }

    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.multiply(&Transform2D {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        })
    }

    /// Rotation by `degrees`, clockwise on a y-down canvas.
    pub fn rotate(self, degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.multiply(&Transform2D {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        })
    }

    /// Rotation by `degrees` about `(cx, cy)`.
    pub fn rotate_about(self, degrees: f32, cx: f32, cy: f32) -> Self {
        self.translate(cx, cy).rotate(degrees).translate(-cx, -cy)
    }

    /// Matrix product `self * other`: `other` applies first.
    pub fn multiply(&self, other: &Transform2D) -> Self {
        Transform2D {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Parse a `transform` attribute. Operations compose left to right.
    pub fn parse(value: &str) -> Result<Self, TransformSyntaxError> {
        TransformParser { src: value, pos: 0 }.parse()
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What went wrong in a transform list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformErrorKind {
    #[error("unknown transform operation {0:?}")]
    UnknownOperation(String),

    #[error("{operation} does not take {count} argument(s)")]
    ArgumentCount { operation: String, count: usize },

    #[error("expected {0}")]
    Expected(&'static str),
}

/// A malformed `transform` attribute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}: {excerpt}")]
pub struct TransformSyntaxError {
    pub offset: usize,
    pub kind: TransformErrorKind,
    pub excerpt: String,
}

struct TransformParser<'a> {
    src: &'a str,
    pos: usize,
}

impl TransformParser<'_> {
    fn error(&self, offset: usize, kind: TransformErrorKind) -> TransformSyntaxError {
        TransformSyntaxError {
            offset,
            kind,
            excerpt: excerpt(self.src, offset),
        }
    }

    fn parse(mut self) -> Result<Transform2D, TransformSyntaxError> {
        let mut result = Transform2D::IDENTITY;
        self.pos = skip_comma_whitespace(self.src, 0);

        while self.pos < self.src.len() {
            let name_start = self.pos;
            let name_len = self.src[name_start..]
                .bytes()
                .take_while(u8::is_ascii_alphabetic)
                .count();
            if name_len == 0 {
                return Err(self.error(name_start, TransformErrorKind::Expected("an operation name")));
            }
            let name = &self.src[name_start..name_start + name_len];
            if !matches!(name, "translate" | "scale" | "rotate") {
                return Err(self.error(
                    name_start,
                    TransformErrorKind::UnknownOperation(name.to_string()),
                ));
            }
            self.pos = skip_whitespace(self.src, name_start + name_len);

            if self.src.as_bytes().get(self.pos) != Some(&b'(') {
                return Err(self.error(self.pos, TransformErrorKind::Expected("'('")));
            }
            self.pos = skip_whitespace(self.src, self.pos + 1);

            let mut args: SmallVec<[f32; 6]> = SmallVec::new();
            while let Some((value, end)) = scan_number(self.src, self.pos) {
                args.push(value);
                self.pos = skip_comma_whitespace(self.src, end);
            }
            if self.src.as_bytes().get(self.pos) != Some(&b')') {
                return Err(self.error(self.pos, TransformErrorKind::Expected("a number or ')'")));
            }
            self.pos = skip_comma_whitespace(self.src, self.pos + 1);

            let step = match (name, args.as_slice()) {
                ("translate", &[tx]) => Transform2D::IDENTITY.translate(tx, 0.0),
                ("translate", &[tx, ty]) => Transform2D::IDENTITY.translate(tx, ty),
                ("scale", &[s]) => Transform2D::IDENTITY.scale(s, s),
                ("scale", &[sx, sy]) => Transform2D::IDENTITY.scale(sx, sy),
                ("rotate", &[angle]) => Transform2D::IDENTITY.rotate(angle),
                ("rotate", &[angle, cx, cy]) => Transform2D::IDENTITY.rotate_about(angle, cx, cy),
                _ => {
                    return Err(self.error(
                        name_start,
                        TransformErrorKind::ArgumentCount {
                            operation: name.to_string(),
                            count: args.len(),
                        },
                    ))
                }
            };
            result = result.multiply(&step);
        }

        Ok(result)
    }
}
