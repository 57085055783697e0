//! Color values and parsing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with alpha multiplied by `opacity` (clamped to 0..=1).
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Channels as `[r, g, b, a]` in 0..=1.
    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            self.a,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A color value that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorFormatError {
    #[error("hex color {0:?} must have 3 or 6 digits")]
    InvalidHexLength(String),

    #[error("invalid hex digit {digit:?} in color {value:?}")]
    InvalidHexDigit { value: String, digit: char },

    #[error("unknown color keyword {0:?}")]
    UnknownKeyword(String),

    #[error("malformed paint reference {0:?}")]
    InvalidReference(String),
}

/// Parse `#rgb`, `#rrggbb` or a color keyword.
pub fn parse_color(value: &str) -> Result<Color, ColorFormatError> {
    let value = value.trim();
    match value.strip_prefix('#') {
        Some(hex) => parse_hex(value, hex),
        None => parse_keyword(value),
    }
}

fn parse_hex(value: &str, hex: &str) -> Result<Color, ColorFormatError> {
    let digits = hex
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or_else(|| ColorFormatError::InvalidHexDigit {
                    value: value.to_string(),
                    digit: c,
                })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    match *digits.as_slice() {
        [r, g, b] => Ok(Color::from_rgb(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Ok(Color::from_rgb(
            (r1 << 4) | r2,
            (g1 << 4) | g2,
            (b1 << 4) | b2,
        )),
        _ => Err(ColorFormatError::InvalidHexLength(value.to_string())),
    }
}

fn parse_keyword(value: &str) -> Result<Color, ColorFormatError> {
    let color = match value {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::from_rgb(255, 0, 0),
        "green" => Color::from_rgb(0, 128, 0),
        "blue" => Color::from_rgb(0, 0, 255),
        "yellow" => Color::from_rgb(255, 255, 0),
        "cyan" => Color::from_rgb(0, 255, 255),
        "magenta" => Color::from_rgb(255, 0, 255),
        "gray" => Color::from_rgb(128, 128, 128),
        "transparent" => Color::TRANSPARENT,
        _ => return Err(ColorFormatError::UnknownKeyword(value.to_string())),
    };
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_and_long_hex_agree() {
        let red = Color::from_rgb(255, 0, 0);
        assert_eq!(parse_color("#ff0000").unwrap(), red);
        assert_eq!(parse_color("#f00").unwrap(), red);
        assert_eq!(parse_color("#F00").unwrap(), red);
    }

    #[test]
    fn test_hex_digit_duplication() {
        assert_eq!(parse_color("#1a8").unwrap(), Color::from_rgb(0x11, 0xaa, 0x88));
        assert_eq!(parse_color("#12AbEf").unwrap(), Color::from_rgb(0x12, 0xab, 0xef));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_color("green").unwrap(), Color::from_rgb(0, 128, 0));
        assert_eq!(parse_color("gray").unwrap(), Color::from_rgb(128, 128, 128));
        assert_eq!(parse_color(" white ").unwrap(), Color::WHITE);
        assert_eq!(parse_color("transparent").unwrap().a, 0.0);
    }

    #[test]
    fn test_invalid_colors() {
        assert_eq!(
            parse_color("#ff00"),
            Err(ColorFormatError::InvalidHexLength("#ff00".to_string()))
        );
        assert_eq!(
            parse_color("#ggg"),
            Err(ColorFormatError::InvalidHexDigit {
                value: "#ggg".to_string(),
                digit: 'g'
            })
        );
        assert_eq!(
            parse_color("orange"),
            Err(ColorFormatError::UnknownKeyword("orange".to_string()))
        );
        assert!(parse_color("").is_err());
    }

    #[test]
    fn test_with_opacity() {
        let c = Color::WHITE.with_opacity(0.5);
        assert_eq!(c.a, 0.5);
        assert_eq!(Color::WHITE.with_opacity(3.0).a, 1.0);
        assert_eq!(c.to_f32_array(), [1.0, 1.0, 1.0, 0.5]);
    }
}
