//! Core taxonomy types for the Plutchik emotion wheel.
//!
//! The wheel is built from 8 primary emotions arranged at 45° steps and
//! 3 intensity bands per primary:
//!
//! - **Primary**: joy, trust, fear, surprise, sadness, disgust, anger, anticipation
//! - **Band**: weak (inner ring), base, strong (outer ring)
//!
//! Everything here is immutable and defined at build time.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Primary Emotion Enum
// =============================================================================

/// The 8 Plutchik primary emotions, in wheel order.
///
/// The declaration order is load-bearing: a primary's wedge starts at
/// `index × 45°` measured clockwise from 12 o'clock.
///
/// | Primary | Angle | Color | Label (ja) |
/// |---------|-------|-------|------------|
/// | Joy | 0° | `#FFE066` | 喜び |
/// | Trust | 45° | `#C7F464` | 信頼 |
/// | Fear | 90° | `#88D8B0` | 恐れ |
/// | Surprise | 135° | `#8EE3EF` | 驚き |
/// | Sadness | 180° | `#6C91BF` | 悲しみ |
/// | Disgust | 225° | `#9E7BB5` | 嫌悪 |
/// | Anger | 270° | `#FF6B6B` | 怒り |
/// | Anticipation | 315° | `#F4A259` | 期待 |
///
/// # Example
///
/// ```rust
/// use empath_gateway::core::emotion::PrimaryEmotion;
///
/// let anger = PrimaryEmotion::Anger;
/// assert_eq!(anger.to_string(), "anger");
/// assert_eq!(anger.angle(), 270.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryEmotion {
    /// Joy, happiness
    Joy,
    /// Trust, acceptance
    Trust,
    /// Fear, apprehension
    Fear,
    /// Surprise, astonishment
    Surprise,
    /// Sadness, grief
    Sadness,
    /// Disgust, aversion
    Disgust,
    /// Anger, irritation
    Anger,
    /// Anticipation, expectancy
    Anticipation,
}

/// Angular width of every wedge, in degrees.
pub const WEDGE_SPAN_DEGREES: f64 = 45.0;

impl PrimaryEmotion {
    /// Returns all primaries in wheel order.
    #[inline]
    pub const fn all() -> &'static [PrimaryEmotion; 8] {
        &[
            PrimaryEmotion::Joy,
            PrimaryEmotion::Trust,
            PrimaryEmotion::Fear,
            PrimaryEmotion::Surprise,
            PrimaryEmotion::Sadness,
            PrimaryEmotion::Disgust,
            PrimaryEmotion::Anger,
            PrimaryEmotion::Anticipation,
        ]
    }

    /// Zero-based position in wheel order.
    #[inline]
    pub const fn index(&self) -> usize {
        match self {
            PrimaryEmotion::Joy => 0,
            PrimaryEmotion::Trust => 1,
            PrimaryEmotion::Fear => 2,
            PrimaryEmotion::Surprise => 3,
            PrimaryEmotion::Sadness => 4,
            PrimaryEmotion::Disgust => 5,
            PrimaryEmotion::Anger => 6,
            PrimaryEmotion::Anticipation => 7,
        }
    }

    /// Start angle of the wedge in degrees (0° = up, clockwise).
    #[inline]
    pub fn angle(&self) -> f64 {
        self.index() as f64 * WEDGE_SPAN_DEGREES
    }

    /// Angle of the wedge's centre line.
    #[inline]
    pub fn center_angle(&self) -> f64 {
        self.angle() + WEDGE_SPAN_DEGREES / 2.0
    }

    /// Base fill color as an uppercase `#RRGGBB` string.
    #[inline]
    pub const fn base_color(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "#FFE066",
            PrimaryEmotion::Trust => "#C7F464",
            PrimaryEmotion::Fear => "#88D8B0",
            PrimaryEmotion::Surprise => "#8EE3EF",
            PrimaryEmotion::Sadness => "#6C91BF",
            PrimaryEmotion::Disgust => "#9E7BB5",
            PrimaryEmotion::Anger => "#FF6B6B",
            PrimaryEmotion::Anticipation => "#F4A259",
        }
    }

    /// English display label.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "Joy",
            PrimaryEmotion::Trust => "Trust",
            PrimaryEmotion::Fear => "Fear",
            PrimaryEmotion::Surprise => "Surprise",
            PrimaryEmotion::Sadness => "Sadness",
            PrimaryEmotion::Disgust => "Disgust",
            PrimaryEmotion::Anger => "Anger",
            PrimaryEmotion::Anticipation => "Anticipation",
        }
    }

    /// Japanese display label used by the clinician dashboard.
    #[inline]
    pub const fn label_ja(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "喜び",
            PrimaryEmotion::Trust => "信頼",
            PrimaryEmotion::Fear => "恐れ",
            PrimaryEmotion::Surprise => "驚き",
            PrimaryEmotion::Sadness => "悲しみ",
            PrimaryEmotion::Disgust => "嫌悪",
            PrimaryEmotion::Anger => "怒り",
            PrimaryEmotion::Anticipation => "期待",
        }
    }

    /// Returns the emotion as a lowercase key.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PrimaryEmotion::Joy => "joy",
            PrimaryEmotion::Trust => "trust",
            PrimaryEmotion::Fear => "fear",
            PrimaryEmotion::Surprise => "surprise",
            PrimaryEmotion::Sadness => "sadness",
            PrimaryEmotion::Disgust => "disgust",
            PrimaryEmotion::Anger => "anger",
            PrimaryEmotion::Anticipation => "anticipation",
        }
    }

    /// Parses a primary from its canonical name (case- and whitespace-insensitive).
    ///
    /// Only the 8 primary names are accepted. Synonyms such as "rage" are
    /// resolved through [`super::taxonomy::resolve_primary`].
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "joy" => Some(PrimaryEmotion::Joy),
            "trust" => Some(PrimaryEmotion::Trust),
            "fear" => Some(PrimaryEmotion::Fear),
            "surprise" => Some(PrimaryEmotion::Surprise),
            "sadness" => Some(PrimaryEmotion::Sadness),
            "disgust" => Some(PrimaryEmotion::Disgust),
            "anger" => Some(PrimaryEmotion::Anger),
            "anticipation" => Some(PrimaryEmotion::Anticipation),
            _ => None,
        }
    }
}

impl fmt::Display for PrimaryEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Intensity Band
// =============================================================================

/// Where an emotion word sits relative to its primary's canonical form.
///
/// Bands map to the three rings outside the primary wedge ring, weak being
/// the innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IntensityBand {
    /// Mild form (e.g. serenity, annoyance)
    Weak,
    /// Canonical form (e.g. joy, anger)
    #[default]
    Base,
    /// Intense form (e.g. ecstasy, rage)
    Strong,
}

impl IntensityBand {
    #[inline]
    pub const fn all() -> &'static [IntensityBand; 3] {
        &[
            IntensityBand::Weak,
            IntensityBand::Base,
            IntensityBand::Strong,
        ]
    }

    /// Ring position counted outwards from the wedge ring (0 = innermost).
    #[inline]
    pub const fn ring_index(&self) -> usize {
        match self {
            IntensityBand::Weak => 0,
            IntensityBand::Base => 1,
            IntensityBand::Strong => 2,
        }
    }

    /// Shade amount applied to the primary's base color for this band.
    #[inline]
    pub const fn shade_amount(&self) -> f64 {
        match self {
            IntensityBand::Weak => 0.25,
            IntensityBand::Base => 0.0,
            IntensityBand::Strong => -0.15,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IntensityBand::Weak => "weak",
            IntensityBand::Base => "base",
            IntensityBand::Strong => "strong",
        }
    }

    /// Legend description of the ring.
    #[inline]
    pub const fn description(&self) -> &'static str {
        match self {
            IntensityBand::Weak => "Inner ring: mild, subdued",
            IntensityBand::Base => "Middle ring: typical level",
            IntensityBand::Strong => "Outer ring: intense, extreme",
        }
    }

    /// Japanese legend description of the ring.
    #[inline]
    pub const fn description_ja(&self) -> &'static str {
        match self {
            IntensityBand::Weak => "内側: 弱い（穏やか・控えめ）",
            IntensityBand::Base => "中間: 基本（通常レベル）",
            IntensityBand::Strong => "外側: 強い（激しい・強烈）",
        }
    }

    /// Parses a band name (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weak" | "mild" | "low" => Some(IntensityBand::Weak),
            "base" | "normal" | "medium" => Some(IntensityBand::Base),
            "strong" | "intense" | "high" => Some(IntensityBand::Strong),
            _ => None,
        }
    }
}

impl fmt::Display for IntensityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Result of resolving an emotion label against the taxonomy.
///
/// `primary == None` is the documented fallback for unrecognized labels; the
/// band is then always [`IntensityBand::Base`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Resolution {
    pub primary: Option<PrimaryEmotion>,
    pub intensity: IntensityBand,
}

impl Resolution {
    #[inline]
    pub const fn new(primary: PrimaryEmotion, intensity: IntensityBand) -> Self {
        Self {
            primary: Some(primary),
            intensity,
        }
    }

    #[inline]
    pub const fn unresolved() -> Self {
        Self {
            primary: None,
            intensity: IntensityBand::Base,
        }
    }

    #[inline]
    pub const fn is_resolved(&self) -> bool {
        self.primary.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // PrimaryEmotion Tests
    // =========================================================================

    #[test]
    fn test_primary_order_and_angles() {
        let angles: Vec<f64> = PrimaryEmotion::all().iter().map(|p| p.angle()).collect();
        assert_eq!(
            angles,
            vec![0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]
        );
        for (i, primary) in PrimaryEmotion::all().iter().enumerate() {
            assert_eq!(primary.index(), i);
        }
    }

    #[test]
    fn test_primary_center_angle() {
        assert_eq!(PrimaryEmotion::Joy.center_angle(), 22.5);
        assert_eq!(PrimaryEmotion::Anger.center_angle(), 292.5);
    }

    #[test]
    fn test_primary_from_str() {
        assert_eq!(PrimaryEmotion::from_str("joy"), Some(PrimaryEmotion::Joy));
        assert_eq!(
            PrimaryEmotion::from_str(" ANGER "),
            Some(PrimaryEmotion::Anger)
        );
        assert_eq!(PrimaryEmotion::from_str("rage"), None);
        assert_eq!(PrimaryEmotion::from_str(""), None);
    }

    #[test]
    fn test_primary_round_trips_through_as_str() {
        for primary in PrimaryEmotion::all() {
            assert_eq!(PrimaryEmotion::from_str(primary.as_str()), Some(*primary));
        }
    }

    #[test]
    fn test_primary_colors_are_hex() {
        for primary in PrimaryEmotion::all() {
            let color = primary.base_color();
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
        }
    }

    #[test]
    fn test_primary_serde() {
        let json = serde_json::to_string(&PrimaryEmotion::Anticipation).unwrap();
        assert_eq!(json, "\"anticipation\"");
        let parsed: PrimaryEmotion = serde_json::from_str("\"sadness\"").unwrap();
        assert_eq!(parsed, PrimaryEmotion::Sadness);
    }

    // =========================================================================
    // IntensityBand Tests
    // =========================================================================

    #[test]
    fn test_band_default_is_base() {
        assert_eq!(IntensityBand::default(), IntensityBand::Base);
    }

    #[test]
    fn test_band_ring_order() {
        assert_eq!(IntensityBand::Weak.ring_index(), 0);
        assert_eq!(IntensityBand::Base.ring_index(), 1);
        assert_eq!(IntensityBand::Strong.ring_index(), 2);
    }

    #[test]
    fn test_band_from_str() {
        assert_eq!(IntensityBand::from_str("WEAK"), Some(IntensityBand::Weak));
        assert_eq!(IntensityBand::from_str("strong"), Some(IntensityBand::Strong));
        assert_eq!(IntensityBand::from_str("nope"), None);
    }

    #[test]
    fn test_resolution_fallback() {
        let r = Resolution::unresolved();
        assert!(!r.is_resolved());
        assert_eq!(r.intensity, IntensityBand::Base);
        assert_eq!(Resolution::default(), r);
    }
}
