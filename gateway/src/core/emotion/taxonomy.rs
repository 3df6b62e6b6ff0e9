//! Label resolution against the emotion taxonomy.
//!
//! The backend classifier may emit one of three vocabularies:
//!
//! 1. one of the 8 primary names (`"anger"`),
//! 2. one of the 16 canonical weak/strong synonyms (`"rage"`),
//! 3. a colloquial or complex word (`"jealousy"`, `"pride"`).
//!
//! Resolution goes: normalize → extended synonym table → canonical table →
//! fallback `(None, Base)`. The extended table is an editorial mapping; it
//! is never computed.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{IntensityBand, PrimaryEmotion, Resolution};

use IntensityBand::{Base, Strong, Weak};
use PrimaryEmotion::{Anger, Anticipation, Disgust, Fear, Joy, Sadness, Surprise, Trust};

// =============================================================================
// Tables
// =============================================================================

/// Canonical weak/strong synonym pair of one primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalEntry {
    pub primary: PrimaryEmotion,
    pub weak: &'static str,
    pub strong: &'static str,
}

/// The canonical intensity table, in wheel order.
pub const CANONICAL_TABLE: [CanonicalEntry; 8] = [
    CanonicalEntry { primary: Joy, weak: "serenity", strong: "ecstasy" },
    CanonicalEntry { primary: Trust, weak: "acceptance", strong: "admiration" },
    CanonicalEntry { primary: Fear, weak: "apprehension", strong: "terror" },
    CanonicalEntry { primary: Surprise, weak: "distraction", strong: "amazement" },
    CanonicalEntry { primary: Sadness, weak: "pensiveness", strong: "grief" },
    CanonicalEntry { primary: Disgust, weak: "boredom", strong: "loathing" },
    CanonicalEntry { primary: Anger, weak: "annoyance", strong: "rage" },
    CanonicalEntry { primary: Anticipation, weak: "interest", strong: "vigilance" },
];

/// Extended synonym table: fine-grained and colloquial words.
///
/// Words that also appear in [`CANONICAL_TABLE`] carry the same mapping.
/// `"neutral"` is intentionally absent and resolves to the fallback.
pub const EXTENDED_TABLE: &[(&str, PrimaryEmotion, IntensityBand)] = &[
    // joy
    ("ecstasy", Joy, Strong),
    ("elation", Joy, Strong),
    ("euphoria", Joy, Strong),
    ("excitement", Joy, Strong),
    ("happiness", Joy, Base),
    ("happy", Joy, Base),
    ("delight", Joy, Base),
    ("cheerfulness", Joy, Base),
    ("pride", Joy, Base),
    ("love", Joy, Base),
    ("gratitude", Joy, Base),
    ("serenity", Joy, Weak),
    ("contentment", Joy, Weak),
    ("relief", Joy, Weak),
    ("calm", Joy, Weak),
    ("satisfaction", Joy, Weak),
    // trust
    ("admiration", Trust, Strong),
    ("adoration", Trust, Strong),
    ("devotion", Trust, Strong),
    ("confidence", Trust, Base),
    ("respect", Trust, Base),
    ("affection", Trust, Base),
    ("acceptance", Trust, Weak),
    ("submission", Trust, Weak),
    ("tolerance", Trust, Weak),
    // fear
    ("terror", Fear, Strong),
    ("panic", Fear, Strong),
    ("horror", Fear, Strong),
    ("dread", Fear, Strong),
    ("anxiety", Fear, Base),
    ("awe", Fear, Base),
    ("alarm", Fear, Base),
    ("apprehension", Fear, Weak),
    ("nervousness", Fear, Weak),
    ("worry", Fear, Weak),
    ("insecurity", Fear, Weak),
    ("timidity", Fear, Weak),
    // surprise
    ("amazement", Surprise, Strong),
    ("astonishment", Surprise, Strong),
    ("shock", Surprise, Strong),
    ("confusion", Surprise, Base),
    ("bewilderment", Surprise, Base),
    ("distraction", Surprise, Weak),
    ("uncertainty", Surprise, Weak),
    // sadness
    ("grief", Sadness, Strong),
    ("despair", Sadness, Strong),
    ("sorrow", Sadness, Strong),
    ("anguish", Sadness, Strong),
    ("loneliness", Sadness, Base),
    ("remorse", Sadness, Base),
    ("guilt", Sadness, Base),
    ("shame", Sadness, Base),
    ("disappointment", Sadness, Base),
    ("hurt", Sadness, Base),
    ("pensiveness", Sadness, Weak),
    ("disapproval", Sadness, Weak),
    ("melancholy", Sadness, Weak),
    // disgust
    ("loathing", Disgust, Strong),
    ("revulsion", Disgust, Strong),
    ("abhorrence", Disgust, Strong),
    ("contempt", Disgust, Base),
    ("aversion", Disgust, Base),
    ("boredom", Disgust, Weak),
    ("dislike", Disgust, Weak),
    // anger
    ("rage", Anger, Strong),
    ("fury", Anger, Strong),
    ("hostility", Anger, Strong),
    ("aggressiveness", Anger, Strong),
    ("frustration", Anger, Base),
    ("jealousy", Anger, Base),
    ("envy", Anger, Base),
    ("resentment", Anger, Base),
    ("indignation", Anger, Base),
    ("annoyance", Anger, Weak),
    ("irritation", Anger, Weak),
    // anticipation
    ("vigilance", Anticipation, Strong),
    ("eagerness", Anticipation, Strong),
    ("optimism", Anticipation, Base),
    ("hope", Anticipation, Base),
    ("expectation", Anticipation, Base),
    ("interest", Anticipation, Weak),
    ("curiosity", Anticipation, Weak),
];

static EXTENDED_INDEX: Lazy<HashMap<&'static str, Resolution>> = Lazy::new(|| {
    EXTENDED_TABLE
        .iter()
        .map(|(word, primary, band)| (*word, Resolution::new(*primary, *band)))
        .collect()
});

// =============================================================================
// Resolution
// =============================================================================

/// Trims and lowercases a label. Returns `None` for empty input.
///
/// This is the only normalization applied anywhere keys are compared
/// (taxonomy lookup, selector filter, summary grouping).
pub fn normalize_key(label: &str) -> Option<String> {
    let key = label.trim().to_lowercase();
    if key.is_empty() { None } else { Some(key) }
}

fn lookup_canonical(key: &str) -> Option<Resolution> {
    CANONICAL_TABLE.iter().find_map(|entry| {
        if key == entry.primary.as_str() {
            Some(Resolution::new(entry.primary, Base))
        } else if key == entry.weak {
            Some(Resolution::new(entry.primary, Weak))
        } else if key == entry.strong {
            Some(Resolution::new(entry.primary, Strong))
        } else {
            None
        }
    })
}

/// Resolves a label to its (primary, band) pair. Never fails.
///
/// # Example
///
/// ```rust
/// use empath_gateway::core::emotion::{IntensityBand, PrimaryEmotion, resolve};
///
/// let r = resolve(" Rage ");
/// assert_eq!(r.primary, Some(PrimaryEmotion::Anger));
/// assert_eq!(r.intensity, IntensityBand::Strong);
///
/// assert_eq!(resolve("neutral").primary, None);
/// ```
pub fn resolve(label: &str) -> Resolution {
    let Some(key) = normalize_key(label) else {
        return Resolution::unresolved();
    };

    if let Some(resolution) = EXTENDED_INDEX.get(key.as_str()) {
        return *resolution;
    }

    lookup_canonical(&key).unwrap_or_else(Resolution::unresolved)
}

/// Same as [`resolve`] but accepts an absent key.
#[inline]
pub fn resolve_optional(label: Option<&str>) -> Resolution {
    label.map(resolve).unwrap_or_else(Resolution::unresolved)
}

#[inline]
pub fn resolve_primary(label: &str) -> Option<PrimaryEmotion> {
    resolve(label).primary
}

/// Resolves the intensity band; unrecognized labels yield [`IntensityBand::Base`].
#[inline]
pub fn resolve_intensity(label: &str) -> IntensityBand {
    resolve(label).intensity
}
