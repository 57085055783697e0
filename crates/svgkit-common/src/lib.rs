//! # svgkit common
//!
//! Logging configuration and diagnostic helpers shared by the svgkit crates.
//!
//! ## Features
//!
//! - Logging configuration and setup
//! - Source excerpts for error messages

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Number of characters shown on each side of the marker in [`excerpt`].
pub const EXCERPT_RADIUS: usize = 15;

/// Render a short window of `source` around byte `offset` for diagnostics.
///
/// The result holds up to [`EXCERPT_RADIUS`] characters before the offset, a `|`
/// marker, and up to [`EXCERPT_RADIUS`] characters after it. Offsets past the
/// end or inside a multi-byte character are clamped to the nearest boundary.
pub fn excerpt(source: &str, offset: usize) -> String {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }

    let (before, after) = source.split_at(offset);
    let skip = before.chars().count().saturating_sub(EXCERPT_RADIUS);

    let mut out = String::with_capacity(EXCERPT_RADIUS * 2 + 1);
    out.extend(before.chars().skip(skip));
    out.push('|');
    out.extend(after.chars().take(EXCERPT_RADIUS));
    out
}
