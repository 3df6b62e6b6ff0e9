//! Plutchik emotion taxonomy.
//!
//! Maps emotion labels coming from the conversation backend onto the
//! 8 primary emotions and 3 intensity bands of the Plutchik wheel, and
//! carries the per-primary presentation metadata (angle, color, labels).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     Emotion Taxonomy                             │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │   " Jealousy "                                                   │
//! │        │ normalize_key (trim + lowercase)                        │
//! │        ▼                                                         │
//! │   ┌───────────────────┐  miss  ┌───────────────────┐  miss       │
//! │   │ EXTENDED_TABLE    │───────▶│ CANONICAL_TABLE   │──────▶ None │
//! │   │ jealousy → anger  │        │ anger/annoyance/  │       Base  │
//! │   │            base   │        │ rage              │             │
//! │   └───────────────────┘        └───────────────────┘             │
//! │        │ hit                          │ hit                      │
//! │        ▼                              ▼                          │
//! │              Resolution { primary, intensity }                   │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution never fails. Unrecognized labels (including `"neutral"`)
//! resolve to no primary and the base band.

pub mod color;
pub mod taxonomy;
pub mod types;

pub use color::{Rgb, shade};
pub use taxonomy::{
    CANONICAL_TABLE, CanonicalEntry, EXTENDED_TABLE, normalize_key, resolve, resolve_intensity,
    resolve_optional, resolve_primary,
};
pub use types::{IntensityBand, PrimaryEmotion, Resolution, WEDGE_SPAN_DEGREES};

/// Color of a primary's band, derived from its base color.
#[inline]
pub fn band_color(primary: PrimaryEmotion, band: IntensityBand) -> String {
    shade(primary.base_color(), band.shade_amount())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_colors_follow_shade_amounts() {
        let base = band_color(PrimaryEmotion::Anger, IntensityBand::Base);
        assert_eq!(base, "#FF6B6B");
        let weak = band_color(PrimaryEmotion::Anger, IntensityBand::Weak);
        assert_eq!(weak, shade("#FF6B6B", 0.25));
        let strong = band_color(PrimaryEmotion::Anger, IntensityBand::Strong);
        assert_eq!(strong, shade("#FF6B6B", -0.15));
    }
}
