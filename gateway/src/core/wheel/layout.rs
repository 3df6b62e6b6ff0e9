//! Scene layout: selected sessions → wedges, bands and markers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::geometry::{Point, WheelGeometry};
use super::tooltip::TooltipContent;
use crate::core::emotion::{IntensityBand, PrimaryEmotion, WEDGE_SPAN_DEGREES, band_color};
use crate::core::session::ConversationSession;

pub const ACTIVE_OPACITY: f64 = 1.0;
pub const INACTIVE_OPACITY: f64 = 0.45;

const JITTER_SPAN: f64 = 0.2;
const NEUTRAL_SCORE: f64 = 0.5;
const FALLBACK_MARKER_SIZE: f64 = 6.0;
const FALLBACK_MARKER_OPACITY: f64 = 0.8;

// =============================================================================
// Options
// =============================================================================

/// How a marker's distance from the centre is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialPolicy {
    /// Snap to the mid-radius of the resolved band, jittered ±10% by score.
    #[default]
    IntensityBand,
    /// Interpolate between the inner and outer marker radius by score;
    /// without a score, spread by recency (most recent outermost).
    Score,
}

impl RadialPolicy {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RadialPolicy::IntensityBand => "intensity_band",
            RadialPolicy::Score => "score",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "intensity_band" | "intensity-band" | "band" | "banded" => {
                Some(RadialPolicy::IntensityBand)
            }
            "score" | "score_driven" | "score-driven" => Some(RadialPolicy::Score),
            _ => None,
        }
    }
}

impl fmt::Display for RadialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    pub geometry: WheelGeometry,
    pub radial_policy: RadialPolicy,
}

impl RenderOptions {
    pub fn new(canvas_size: f64, radial_policy: RadialPolicy) -> Self {
        Self {
            geometry: WheelGeometry::new(canvas_size),
            radial_policy,
        }
    }
}

// =============================================================================
// Scene
// =============================================================================

/// One primary's slice of the inner ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wedge {
    pub primary: PrimaryEmotion,
    pub label: &'static str,
    pub label_ja: &'static str,
    pub color: &'static str,
    pub start_angle: f64,
    pub end_angle: f64,
    pub active: bool,
    pub opacity: f64,
    pub path: String,
    pub label_position: Point,
}

/// One intensity sub-band of a primary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Band {
    pub primary: PrimaryEmotion,
    pub intensity: IntensityBand,
    pub color: String,
    pub r_inner: f64,
    pub r_outer: f64,
    pub path: String,
}

/// One selected session drawn on the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub session_id: String,
    pub primary: PrimaryEmotion,
    pub intensity: IntensityBand,
    pub angle: f64,
    pub radius: f64,
    pub position: Point,
    pub size: f64,
    pub opacity: f64,
    pub color: String,
    pub score: Option<f64>,
    pub placeholder: bool,
    pub tooltip: TooltipContent,
}

/// Everything needed to draw the wheel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelScene {
    pub geometry: WheelGeometry,
    pub radial_policy: RadialPolicy,
    pub wedges: Vec<Wedge>,
    pub bands: Vec<Band>,
    /// In selection order (most recent first).
    pub markers: Vec<Marker>,
    pub active: Option<PrimaryEmotion>,
    /// Selected sessions whose emotion resolved to no primary.
    pub unplaced: usize,
}

impl WheelScene {
    /// Marker under `point`, preferring the closest when several overlap.
    pub fn marker_at(&self, point: Point) -> Option<&Marker> {
        self.markers
            .iter()
            .map(|m| {
                let dx = m.position.x - point.x;
                let dy = m.position.y - point.y;
                (m, (dx * dx + dy * dy).sqrt())
            })
            .filter(|(m, distance)| *distance <= m.size)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _)| m)
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn build_wedges(geometry: &WheelGeometry, active: Option<PrimaryEmotion>) -> Vec<Wedge> {
    let label_r = (geometry.inner_r + geometry.outer_r) / 2.0;
    PrimaryEmotion::all()
        .iter()
        .map(|primary| {
            let start = primary.angle();
            let end = start + WEDGE_SPAN_DEGREES;
            let is_active = active == Some(*primary);
            Wedge {
                primary: *primary,
                label: primary.label(),
                label_ja: primary.label_ja(),
                color: primary.base_color(),
                start_angle: start,
                end_angle: end,
                active: is_active,
                opacity: if is_active {
                    ACTIVE_OPACITY
                } else {
                    INACTIVE_OPACITY
                },
                path: geometry.sector_path(geometry.inner_r, geometry.outer_r, start, end),
                label_position: geometry.point(label_r, primary.center_angle()),
            }
        })
        .collect()
}

fn build_bands(geometry: &WheelGeometry) -> Vec<Band> {
    let mut bands = Vec::with_capacity(PrimaryEmotion::all().len() * 3);
    for primary in PrimaryEmotion::all() {
        let start = primary.angle();
        let end = start + WEDGE_SPAN_DEGREES;
        for band in IntensityBand::all() {
            let (r_inner, r_outer) = geometry.band_bounds(*band);
            bands.push(Band {
                primary: *primary,
                intensity: *band,
                color: band_color(*primary, *band),
                r_inner,
                r_outer,
                path: geometry.sector_path(r_inner, r_outer, start, end),
            });
        }
    }
    bands
}

fn marker_radius(
    options: &RenderOptions,
    intensity: IntensityBand,
    score: Option<f64>,
    index: usize,
    count: usize,
) -> f64 {
    let geometry = &options.geometry;
    match options.radial_policy {
        RadialPolicy::IntensityBand => {
            let s = score.unwrap_or(NEUTRAL_SCORE);
            let (r_inner, r_outer) = geometry.band_bounds(intensity);
            let jittered = geometry.band_mid(intensity) * (1.0 + (s - NEUTRAL_SCORE) * JITTER_SPAN);
            // Jitter never carries a marker out of its band.
            jittered.clamp(r_inner, r_outer)
        }
        RadialPolicy::Score => {
            let t = score.unwrap_or_else(|| (count - index) as f64 / count as f64);
            let inner = geometry.inner_marker_r();
            let outer = geometry.outer_marker_r();
            inner + (outer - inner) * t
        }
    }
}

/// Lays out the wheel for `selected` (most recent first).
///
/// Only `selected[0]` decides which wedge is active. Sessions whose
/// emotion does not resolve to a primary get no marker and are counted in
/// [`WheelScene::unplaced`].
pub fn render(selected: &[&ConversationSession], options: &RenderOptions) -> WheelScene {
    let geometry = options.geometry;
    let active = selected.first().and_then(|s| s.resolution().primary);

    let count = selected.len();
    let mut markers = Vec::with_capacity(count);
    let mut unplaced = 0;

    for (index, session) in selected.iter().enumerate() {
        let resolution = session.resolution();
        let Some(primary) = resolution.primary else {
            unplaced += 1;
            continue;
        };

        let score = session.clamped_score();
        let angle = primary.center_angle();
        let radius = marker_radius(options, resolution.intensity, score, index, count);

        markers.push(Marker {
            session_id: session.id.clone(),
            primary,
            intensity: resolution.intensity,
            angle,
            radius,
            position: geometry.point(radius, angle),
            size: score.map_or(FALLBACK_MARKER_SIZE, |s| 4.0 + s * 6.0),
            opacity: score.map_or(FALLBACK_MARKER_OPACITY, |s| 0.6 + s * 0.4),
            color: band_color(primary, resolution.intensity),
            score,
            placeholder: session.placeholder,
            tooltip: TooltipContent::for_session(session),
        });
    }

    WheelScene {
        geometry,
        radial_policy: options.radial_policy,
        wedges: build_wedges(&geometry, active),
        bands: build_bands(&geometry),
        markers,
        active,
        unplaced,
    }
}
