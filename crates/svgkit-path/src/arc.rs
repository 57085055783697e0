//! Elliptical arc flattening.
//!
//! Converts an SVG endpoint-parameterized arc into cubic bezier segments of at
//! most 45 degrees each. The geometry is computed in `f64` and emitted as
//! `f32`.
//!
//! References:
//! - <https://www.w3.org/TR/SVG11/implnote.html#ArcImplementationNotes>
//! - <http://www.spaceroots.org/documents/ellipse/node22.html>

use crate::command::Point;
use crate::sink::PathSink;
use std::f64::consts::PI;
use tracing::debug;

/// Radii are scaled by `distance / RADIUS_CORRECTION` when the end points are
/// too far apart for the ellipse; a divisor just under 2 keeps the scaled
/// ellipse solvable.
const RADIUS_CORRECTION: f64 = 1.99999;

/// Emit cubic segments approximating the arc from `from` to `to` into `sink`.
///
/// Emits nothing when the end points coincide. Radii are used by absolute
/// value; a zero radius, or radii that admit no finite ellipse, degenerate to
/// a single straight cubic.
#[allow(clippy::too_many_arguments)]
pub fn flatten_arc<S: PathSink + ?Sized>(
    sink: &mut S,
    from: Point,
    to: Point,
    rx: f32,
    ry: f32,
    rotation_deg: f32,
    large_arc: bool,
    sweep: bool,
) {
    if from == to {
        return;
    }
    if rx == 0.0 || ry == 0.0 {
        sink.cubic_to(from, to, to);
        return;
    }

    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (x1, y1) = (f64::from(to.x), f64::from(to.y));
    let mut a = f64::from(rx).abs();
    let mut b = f64::from(ry).abs();

    let theta = f64::from(rotation_deg).to_radians();
    let (sin_theta, cos_theta) = theta.sin_cos();

    loop {
        // End points in unit-circle space: inverse rotation, then inverse scale.
        let x0p = (x0 * cos_theta + y0 * sin_theta) / a;
        let y0p = (-x0 * sin_theta + y0 * cos_theta) / b;
        let x1p = (x1 * cos_theta + y1 * sin_theta) / a;
        let y1p = (-x1 * sin_theta + y1 * cos_theta) / b;

        let dx = x0p - x1p;
        let dy = y0p - y1p;
        let xm = (x0p + x1p) / 2.0;
        let ym = (y0p + y1p) / 2.0;

        let dsq = dx * dx + dy * dy;
        if dsq == 0.0 || !dsq.is_finite() {
            debug!(rx, ry, dsq, "No finite ellipse through arc end points, drawing a line");
            sink.cubic_to(from, to, to);
            return;
        }

        let disc = 1.0 / dsq - 0.25;
        if disc < 0.0 {
            let adjust = dsq.sqrt() / RADIUS_CORRECTION;
            a *= adjust;
            b *= adjust;
            continue;
        }

        let s = disc.sqrt();
        let (sdx, sdy) = (s * dx, s * dy);
        let (mut cx, mut cy) = if large_arc == sweep {
            (xm - sdy, ym + sdx)
        } else {
            (xm + sdy, ym - sdx)
        };

        let eta0 = (y0p - cy).atan2(x0p - cx);
        let eta1 = (y1p - cy).atan2(x1p - cx);

        let mut sweep_angle = eta1 - eta0;
        if sweep != (sweep_angle >= 0.0) {
            if sweep_angle > 0.0 {
                sweep_angle -= 2.0 * PI;
            } else {
                sweep_angle += 2.0 * PI;
            }
        }

        // Center back in user space.
        cx *= a;
        cy *= b;
        let center = (cx * cos_theta - cy * sin_theta, cx * sin_theta + cy * cos_theta);

        emit_segments(
            sink,
            Ellipse {
                center,
                a,
                b,
                sin_theta,
                cos_theta,
            },
            (x0, y0),
            eta0,
            sweep_angle,
        );
        return;
    }
}

struct Ellipse {
    center: (f64, f64),
    a: f64,
    b: f64,
    sin_theta: f64,
    cos_theta: f64,
}

impl Ellipse {
    fn point(&self, eta: f64) -> (f64, f64) {
        let (sin_eta, cos_eta) = eta.sin_cos();
        (
            self.center.0 + self.a * self.cos_theta * cos_eta - self.b * self.sin_theta * sin_eta,
            self.center.1 + self.a * self.sin_theta * cos_eta + self.b * self.cos_theta * sin_eta,
        )
    }

    fn derivative(&self, eta: f64) -> (f64, f64) {
        let (sin_eta, cos_eta) = eta.sin_cos();
        (
            -self.a * self.cos_theta * sin_eta - self.b * self.sin_theta * cos_eta,
            -self.a * self.sin_theta * sin_eta + self.b * self.cos_theta * cos_eta,
        )
    }
}

fn to_point((x, y): (f64, f64)) -> Point {
    Point::new(x as f32, y as f32)
}

fn emit_segments<S: PathSink + ?Sized>(
    sink: &mut S,
    ellipse: Ellipse,
    start: (f64, f64),
    start_angle: f64,
    sweep: f64,
) {
    let segments = (sweep * 4.0 / PI).abs().ceil() as usize;
    if segments == 0 {
        return;
    }
    let step = sweep / segments as f64;

    let mut eta1 = start_angle;
    let mut e1 = start;
    let mut ep1 = ellipse.derivative(eta1);

    for _ in 0..segments {
        let eta2 = eta1 + step;
        let e2 = ellipse.point(eta2);
        let ep2 = ellipse.derivative(eta2);

        let tan_half = ((eta2 - eta1) / 2.0).tan();
        let alpha = (eta2 - eta1).sin() * ((4.0 + 3.0 * tan_half * tan_half).sqrt() - 1.0) / 3.0;

        let q1 = (e1.0 + alpha * ep1.0, e1.1 + alpha * ep1.1);
        let q2 = (e2.0 - alpha * ep2.0, e2.1 - alpha * ep2.1);
        sink.cubic_to(to_point(q1), to_point(q2), to_point(e2));

        eta1 = eta2;
        e1 = e2;
        ep1 = ep2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{PathBuilder, PathSegment};

    fn approx(a: Point, b: Point, tolerance: f32) -> bool {
        (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
    }

    fn flatten(from: Point, to: Point, rx: f32, ry: f32, large: bool, sweep: bool) -> PathBuilder {
        let mut builder = PathBuilder::new();
        flatten_arc(&mut builder, from, to, rx, ry, 0.0, large, sweep);
        builder
    }

    #[test]
    fn test_coincident_points_emit_nothing() {
        let p = Point::new(5.0, 5.0);
        assert!(flatten(p, p, 10.0, 10.0, false, true).is_empty());
    }

    #[test]
    fn test_quarter_circle_is_two_segments() {
        let builder = flatten(Point::new(90.0, 0.0), Point::new(100.0, 10.0), 10.0, 10.0, false, true);
        let points = builder.end_points();
        assert_eq!(points.len(), 2);
        // Midpoint of the corner arc centered at (90, 10).
        let h = 10.0 * std::f32::consts::FRAC_1_SQRT_2;
        assert!(approx(points[0], Point::new(90.0 + h, 10.0 - h), 1e-3));
        assert!(approx(points[1], Point::new(100.0, 10.0), 1e-3));
    }

    #[test]
    fn test_semicircle_sweep_direction() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(100.0, 0.0);

        let up = flatten(from, to, 50.0, 50.0, false, true).end_points();
        assert_eq!(up.len(), 4);
        assert!(approx(up[1], Point::new(50.0, -50.0), 1e-3));
        assert!(approx(up[3], to, 1e-3));

        let down = flatten(from, to, 50.0, 50.0, false, false).end_points();
        assert_eq!(down.len(), 4);
        assert!(approx(down[1], Point::new(50.0, 50.0), 1e-3));
    }

    #[test]
    fn test_large_arc_takes_long_way() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 10.0);
        let small = flatten(from, to, 10.0, 10.0, false, true);
        let large = flatten(from, to, 10.0, 10.0, true, true);
        assert_eq!(small.segments().len(), 2);
        assert_eq!(large.segments().len(), 6);
        assert!(approx(large.current_point(), to, 1e-3));
    }

    #[test]
    fn test_radii_too_small_are_scaled_up() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(100.0, 0.0);
        let points = flatten(from, to, 10.0, 10.0, false, true).end_points();
        assert_eq!(points.len(), 4);
        assert!(approx(points[1], Point::new(50.0, -50.0), 0.5));
        assert!(approx(points[3], to, 1e-3));
    }

    #[test]
    fn test_negative_radii_use_absolute_value() {
        let from = Point::new(90.0, 0.0);
        let to = Point::new(100.0, 10.0);
        let positive = flatten(from, to, 10.0, 10.0, false, true);
        let negative = flatten(from, to, -10.0, -10.0, false, true);
        assert_eq!(positive.segments(), negative.segments());
    }

    #[test]
    fn test_rotated_ellipse_ends_at_target() {
        let mut builder = PathBuilder::new();
        let from = Point::new(10.0, 20.0);
        let to = Point::new(60.0, 45.0);
        flatten_arc(&mut builder, from, to, 40.0, 15.0, 30.0, true, false);
        assert!(!builder.is_empty());
        assert!(approx(builder.current_point(), to, 1e-3));
    }

    #[test]
    fn test_zero_radius_is_straight_cubic() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(20.0, 20.0);
        let builder = flatten(from, to, 0.0, 5.0, false, true);
        assert_eq!(
            builder.segments(),
            &[PathSegment::CubicTo {
                c1: from,
                c2: to,
                to
            }]
        );
    }

    #[test]
    fn test_non_finite_radius_is_straight_cubic() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 5.0);
        let builder = flatten(from, to, f32::NAN, 5.0, false, true);
        assert_eq!(
            builder.segments(),
            &[PathSegment::CubicTo {
                c1: from,
                c2: to,
                to
            }]
        );
    }
}
