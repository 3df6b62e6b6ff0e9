//! Hex color arithmetic for deriving band shades from a primary's base color.

use std::fmt;

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `#RGB` (leading `#` optional, case-insensitive).
    pub fn parse(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return None;
        }
        match digits.len() {
            6 => Some(Self::new(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let expand = |i: usize| -> Option<u8> {
                    let v = u8::from_str_radix(&digits[i..i + 1], 16).ok()?;
                    Some(v * 17)
                };
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Adds `amount × 255` to every channel, clamping to `[0, 255]`.
    pub fn shade(self, amount: f64) -> Self {
        let delta = amount * 255.0;
        let channel = |c: u8| -> u8 { (c as f64 + delta).round().clamp(0.0, 255.0) as u8 };
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Lightens (positive `amount`) or darkens (negative) a hex color.
///
/// Malformed input is returned unchanged so a bad palette entry can never
/// break rendering.
///
/// ```rust
/// use empath_gateway::core::emotion::shade;
///
/// assert_eq!(shade("#FF6B6B", 0.0), "#FF6B6B");
/// assert_eq!(shade("#000000", 0.5), "#808080");
/// assert_eq!(shade("not-a-color", 0.2), "not-a-color");
/// ```
pub fn shade(color: &str, amount: f64) -> String {
    match Rgb::parse(color) {
        Some(rgb) => rgb.shade(amount).to_string(),
        None => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emotion::PrimaryEmotion;

    #[test]
    fn test_parse_long_and_short_forms() {
        assert_eq!(Rgb::parse("#FFE066"), Some(Rgb::new(0xFF, 0xE0, 0x66)));
        assert_eq!(Rgb::parse("ffe066"), Some(Rgb::new(0xFF, 0xE0, 0x66)));
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#GGGGGG"), None);
        assert_eq!(Rgb::parse("#ééé"), None);
    }

    #[test]
    fn test_shade_zero_is_identity() {
        for primary in PrimaryEmotion::all() {
            assert_eq!(shade(primary.base_color(), 0.0), primary.base_color());
        }
    }

    #[test]
    fn test_shade_lightens_and_darkens() {
        assert_eq!(shade("#6C91BF", 0.25), "#ACD1FF");
        assert_eq!(shade("#6C91BF", -0.15), "#466B99");
    }

    #[test]
    fn test_shade_clamps_channels() {
        assert_eq!(shade("#FFE066", 0.5), "#FFFFE6");
        assert_eq!(shade("#102030", -1.0), "#000000");
        assert_eq!(shade("#FFFFFF", 2.0), "#FFFFFF");
    }

    #[test]
    fn test_shade_round_trip_stays_in_range() {
        for primary in PrimaryEmotion::all() {
            for amount in [0.1, 0.25, 0.6, 1.0] {
                let there = shade(primary.base_color(), amount);
                let back = shade(&there, -amount);
                assert!(Rgb::parse(&back).is_some(), "{back}");
            }
        }
    }

    #[test]
    fn test_shade_passes_through_malformed_input() {
        assert_eq!(shade("", 0.3), "");
        assert_eq!(shade("rgb(1,2,3)", -0.3), "rgb(1,2,3)");
    }
}
