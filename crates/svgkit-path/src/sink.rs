//! Path sink capability and a recording implementation.

use crate::command::Point;
use serde::Serialize;

/// Receiver of absolute path geometry.
///
/// Rendering backends implement this to consume resolved paths; the core
/// never depends on a concrete canvas.
pub trait PathSink {
    fn move_to(&mut self, to: Point);
    fn line_to(&mut self, to: Point);
    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point);
    fn quadratic_to(&mut self, c1: Point, to: Point);
    fn close(&mut self);
}

/// One segment recorded by [`PathBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { to: Point },
    LineTo { to: Point },
    CubicTo { c1: Point, c2: Point, to: Point },
    QuadTo { c1: Point, to: Point },
    Close,
}

/// A [`PathSink`] that records everything it receives.
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    segments: Vec<PathSegment>,
    start: Point,
    current: Point,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<PathSegment> {
        self.segments
    }

    pub fn current_point(&self) -> Point {
        self.current
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End point of every segment in order. `Close` ends at the start of its
    /// subpath.
    pub fn end_points(&self) -> Vec<Point> {
        let mut start = Point::ZERO;
        self.segments
            .iter()
            .map(|segment| match *segment {
                PathSegment::MoveTo { to } => {
                    start = to;
                    to
                }
                PathSegment::LineTo { to }
                | PathSegment::CubicTo { to, .. }
                | PathSegment::QuadTo { to, .. } => to,
                PathSegment::Close => start,
            })
            .collect()
    }
}

impl PathSink for PathBuilder {
    fn move_to(&mut self, to: Point) {
        self.segments.push(PathSegment::MoveTo { to });
        self.start = to;
        self.current = to;
    }

    fn line_to(&mut self, to: Point) {
        self.segments.push(PathSegment::LineTo { to });
        self.current = to;
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, to: Point) {
        self.segments.push(PathSegment::CubicTo { c1, c2, to });
        self.current = to;
    }

    fn quadratic_to(&mut self, c1: Point, to: Point) {
        self.segments.push(PathSegment::QuadTo { c1, to });
        self.current = to;
    }

    fn close(&mut self) {
        self.segments.push(PathSegment::Close);
        self.current = self.start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_tracks_current_point() {
        let mut builder = PathBuilder::new();
        assert!(builder.is_empty());
        builder.move_to(Point::new(1.0, 1.0));
        builder.line_to(Point::new(5.0, 1.0));
        assert_eq!(builder.current_point(), Point::new(5.0, 1.0));
        builder.close();
        assert_eq!(builder.current_point(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_end_points() {
        let mut builder = PathBuilder::new();
        builder.move_to(Point::new(0.0, 0.0));
        builder.quadratic_to(Point::new(5.0, 5.0), Point::new(10.0, 0.0));
        builder.cubic_to(Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 3.0));
        builder.close();
        builder.move_to(Point::new(7.0, 7.0));
        builder.close();
        assert_eq!(
            builder.end_points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(3.0, 3.0),
                Point::new(0.0, 0.0),
                Point::new(7.0, 7.0),
                Point::new(7.0, 7.0),
            ]
        );
        assert_eq!(builder.into_segments().len(), 6);
    }
}
