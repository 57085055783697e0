//! # svgkit path
//!
//! Path data for svgkit: the `d` attribute compiler, the elliptical arc
//! flattener and the [`PathSink`] capability through which resolved geometry
//! reaches a renderer.
//!
//! ## Features
//!
//! - [`compile_path`]: `d` string to [`PathCommand`]s, with unset axes and
//!   control points kept explicit
//! - [`resolve_path`]: fold commands into absolute geometry on any sink
//! - [`flatten_arc`]: elliptical arcs as cubic beziers
//! - [`PathBuilder`]: a recording sink

pub mod arc;
pub mod command;
pub mod compiler;
pub mod number;
pub mod resolve;
pub mod sink;

pub use arc::flatten_arc;
pub use command::{PathCommand, Point};
pub use compiler::{compile_path, PathSyntaxError, PathSyntaxErrorKind};
pub use resolve::resolve_path;
pub use sink::{PathBuilder, PathSegment, PathSink};
