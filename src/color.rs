//! Hex color parsing for overlay fill/stroke values.

use crate::error::{ThumbforgeError, ThumbforgeResult};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional, case
/// insensitive).
pub fn parse_hex(s: &str) -> ThumbforgeResult<Rgba8> {
    let hex = s.trim().trim_start_matches('#');

    let nibble = |c: u8| -> ThumbforgeResult<u8> {
        match c {
            b'0'..=b'9' => Ok(c - b'0'),
            b'a'..=b'f' => Ok(c - b'a' + 10),
            b'A'..=b'F' => Ok(c - b'A' + 10),
            _ => Err(ThumbforgeError::validation(format!(
                "invalid hex color '{s}'"
            ))),
        }
    };
    let byte = |hi: u8, lo: u8| -> ThumbforgeResult<u8> { Ok(nibble(hi)? << 4 | nibble(lo)?) };

    let b = hex.as_bytes();
    match b.len() {
        3 => Ok(Rgba8 {
            r: byte(b[0], b[0])?,
            g: byte(b[1], b[1])?,
            b: byte(b[2], b[2])?,
            a: 255,
        }),
        6 => Ok(Rgba8 {
            r: byte(b[0], b[1])?,
            g: byte(b[2], b[3])?,
            b: byte(b[4], b[5])?,
            a: 255,
        }),
        8 => Ok(Rgba8 {
            r: byte(b[0], b[1])?,
            g: byte(b[2], b[3])?,
            b: byte(b[4], b[5])?,
            a: byte(b[6], b[7])?,
        }),
        _ => Err(ThumbforgeError::validation(format!(
            "hex color '{s}' must have 3, 6 or 8 digits"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(parse_hex("#fff").unwrap(), Rgba8::rgb(255, 255, 255));
        assert_eq!(parse_hex("#4f46e5").unwrap(), Rgba8::rgb(0x4f, 0x46, 0xe5));
        assert_eq!(
            parse_hex("00000080").unwrap(),
            Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0x80
            }
        );
        assert_eq!(parse_hex("  #ABC  ").unwrap(), Rgba8::rgb(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn rejects_bad_lengths_and_digits() {
        assert!(parse_hex("#ffff").is_err());
        assert!(parse_hex("#gggggg").is_err());
        assert!(parse_hex("").is_err());
    }
}
