//! Consumer-side path resolution.
//!
//! Folds a command list into absolute geometry: tracks the current point and
//! subpath start, resolves relative coordinates and unset axes, reflects
//! smooth-curve control points and flattens arcs.

use crate::arc::flatten_arc;
use crate::command::{PathCommand, Point};
use crate::sink::PathSink;

/// Last control point of the previous command, if it was a curve.
#[derive(Debug, Clone, Copy)]
enum LastControl {
    None,
    Cubic(Point),
    Quad(Point),
}

/// Feed `commands` to `sink` as absolute geometry. Returns the final current
/// point.
pub fn resolve_path<S: PathSink + ?Sized>(commands: &[PathCommand], sink: &mut S) -> Point {
    let mut current = Point::ZERO;
    let mut start = Point::ZERO;
    let mut last = LastControl::None;

    let absolute = |current: Point, p: Point, relative: bool| if relative { current + p } else { p };

    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y, relative } => {
                let to = absolute(current, Point::new(x, y), relative);
                sink.move_to(to);
                current = to;
                start = to;
                last = LastControl::None;
            }
            PathCommand::LineTo { x, y, relative } => {
                let axis = |value: Option<f32>, base: f32| match value {
                    Some(v) if relative => base + v,
                    Some(v) => v,
                    None => base,
                };
                let to = Point::new(axis(x, current.x), axis(y, current.y));
                sink.line_to(to);
                current = to;
                last = LastControl::None;
            }
            PathCommand::CurveTo {
                c1,
                c2,
                end,
                relative,
            } => {
                let c1 = match (c1, last) {
                    (Some(c1), _) => absolute(current, c1, relative),
                    (None, LastControl::Cubic(prev)) => prev.reflect_through(current),
                    (None, _) => current,
                };
                let c2 = absolute(current, c2, relative);
                let end = absolute(current, end, relative);
                sink.cubic_to(c1, c2, end);
                current = end;
                last = LastControl::Cubic(c2);
            }
            PathCommand::QuadTo { c1, end, relative } => {
                let c1 = match (c1, last) {
                    (Some(c1), _) => absolute(current, c1, relative),
                    (None, LastControl::Quad(prev)) => prev.reflect_through(current),
                    (None, _) => current,
                };
                let end = absolute(current, end, relative);
                sink.quadratic_to(c1, end);
                current = end;
                last = LastControl::Quad(c1);
            }
            PathCommand::ArcTo {
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x,
                y,
                relative,
            } => {
                let end = absolute(current, Point::new(x, y), relative);
                flatten_arc(sink, current, end, rx, ry, rotation, large_arc, sweep);
                current = end;
                last = LastControl::None;
            }
            PathCommand::Close => {
                sink.close();
                current = start;
                last = LastControl::None;
            }
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile_path;
    use crate::sink::{PathBuilder, PathSegment};

    fn resolve(d: &str) -> PathBuilder {
        let commands = compile_path(d).unwrap();
        let mut builder = PathBuilder::new();
        resolve_path(&commands, &mut builder);
        builder
    }

    #[test]
    fn test_horizontal_vertical_resolve_against_current_point() {
        let builder = resolve("M10 10 H 90 V 90 H 10 Z");
        assert_eq!(
            builder.end_points(),
            vec![
                Point::new(10.0, 10.0),
                Point::new(90.0, 10.0),
                Point::new(90.0, 90.0),
                Point::new(10.0, 90.0),
                Point::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_relative_commands_accumulate() {
        let builder = resolve("m5 5 l10 0 h5 v-5 z m1 1 l1 1");
        assert_eq!(
            builder.end_points(),
            vec![
                Point::new(5.0, 5.0),
                Point::new(15.0, 5.0),
                Point::new(20.0, 5.0),
                Point::new(20.0, 0.0),
                Point::new(5.0, 5.0),
                Point::new(6.0, 6.0),
                Point::new(7.0, 7.0),
            ]
        );
    }

    #[test]
    fn test_smooth_cubic_reflects_previous_control() {
        let builder = resolve("M0 0 C 0,0 10,10 20,20 S 30,10 40,20");
        match builder.segments()[2] {
            PathSegment::CubicTo { c1, c2, to } => {
                assert_eq!(c1, Point::new(30.0, 30.0));
                assert_eq!(c2, Point::new(30.0, 10.0));
                assert_eq!(to, Point::new(40.0, 20.0));
            }
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_smooth_cubic_after_line_uses_current_point() {
        let builder = resolve("M0 0 L 20,20 S 30,10 40,20");
        match builder.segments()[2] {
            PathSegment::CubicTo { c1, .. } => assert_eq!(c1, Point::new(20.0, 20.0)),
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_smooth_quad_reflects_only_quads() {
        let builder = resolve("M0 0 Q 10,0 10,10 T 10,30");
        match builder.segments()[2] {
            PathSegment::QuadTo { c1, to } => {
                assert_eq!(c1, Point::new(10.0, 20.0));
                assert_eq!(to, Point::new(10.0, 30.0));
            }
            other => panic!("expected quad, got {:?}", other),
        }

        // A cubic does not feed a following T.
        let builder = resolve("M0 0 C 0,0 5,5 10,10 T 20,20");
        match builder.segments()[2] {
            PathSegment::QuadTo { c1, .. } => assert_eq!(c1, Point::new(10.0, 10.0)),
            other => panic!("expected quad, got {:?}", other),
        }
    }

    #[test]
    fn test_relative_smooth_cubic() {
        let builder = resolve("M0 0 c 0,0 10,10 20,20 s 10,-10 20,0");
        match builder.segments()[2] {
            PathSegment::CubicTo { c1, c2, to } => {
                assert_eq!(c1, Point::new(30.0, 30.0));
                assert_eq!(c2, Point::new(30.0, 10.0));
                assert_eq!(to, Point::new(40.0, 20.0));
            }
            other => panic!("expected cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_is_flattened_to_cubics() {
        let builder = resolve("M0 0 A 50 50 0 0 1 100 0");
        assert_eq!(builder.segments().len(), 5);
        assert!(builder.segments()[1..]
            .iter()
            .all(|s| matches!(s, PathSegment::CubicTo { .. })));
    }

    #[test]
    fn test_returns_final_point() {
        let commands = compile_path("M1 1 L 4 5 Z").unwrap();
        let mut builder = PathBuilder::new();
        assert_eq!(resolve_path(&commands, &mut builder), Point::new(1.0, 1.0));
    }
}
