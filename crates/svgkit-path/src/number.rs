//! Number scanning shared by the path and transform grammars.
//!
//! Scanning works on byte offsets into a `&str`. All grammar characters are
//! ASCII, so any offset returned here is a char boundary.

/// Whether `b` is an SVG whitespace byte.
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Offset of the first non-whitespace byte at or after `pos`.
pub fn skip_whitespace(src: &str, pos: usize) -> usize {
    let bytes = src.as_bytes();
    let mut pos = pos;
    while pos < bytes.len() && is_whitespace(bytes[pos]) {
        pos += 1;
    }
    pos
}

/// Like [`skip_whitespace`], also skipping commas.
pub fn skip_comma_whitespace(src: &str, pos: usize) -> usize {
    let bytes = src.as_bytes();
    let mut pos = pos;
    while pos < bytes.len() && (is_whitespace(bytes[pos]) || bytes[pos] == b',') {
        pos += 1;
    }
    pos
}

fn skip_digits(bytes: &[u8], pos: usize) -> usize {
    let mut pos = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

/// Scan a signed floating point number starting exactly at `pos`.
///
/// Accepts `[+-]? (digits ('.' digits?)? | '.' digits) ([eE] [+-]? digits)?`.
/// Returns the value and the offset one past its last byte, or `None` if no
/// number starts at `pos`. A second `.` ends the number, so `0.5.5` scans as
/// `0.5` followed by `.5`.
pub fn scan_number(src: &str, pos: usize) -> Option<(f32, usize)> {
    let bytes = src.as_bytes();
    let start = pos;
    let mut pos = pos;

    if pos < bytes.len() && matches!(bytes[pos], b'+' | b'-') {
        pos += 1;
    }

    let int_end = skip_digits(bytes, pos);
    let mut mantissa_digits = int_end - pos;
    pos = int_end;

    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_end = skip_digits(bytes, pos + 1);
        mantissa_digits += frac_end - (pos + 1);
        pos = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        let mut exp = pos + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = skip_digits(bytes, exp);
        if exp_end > exp {
            pos = exp_end;
        }
    }

    let value = src[start..pos].parse::<f32>().ok()?;
    Some((value, pos))
}
