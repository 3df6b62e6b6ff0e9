//! Polar geometry of the wheel.
//!
//! Angles are in degrees, 0° at 12 o'clock, increasing clockwise. The −90°
//! offset in [`polar_to_cartesian`] rotates the mathematical convention
//! (0° = right) to this visual one.
//!
//! ```text
//!                 outer2R ─┐
//!            ┌── strong ───┤
//!            ├── base ─────┤ intensity ring (outerR+margin .. outer2R−margin)
//!            ├── weak ─────┤
//!   outerR ──┴─────────────┘
//!            primary wedge ring (innerR .. outerR)
//!   innerR ── hole
//! ```

use serde::Serialize;
use std::f64::consts::PI;

use crate::core::emotion::IntensityBand;

/// Default canvas side length in pixels.
pub const DEFAULT_CANVAS_SIZE: f64 = 300.0;
/// Smallest canvas the layout stays legible at.
pub const MIN_CANVAS_SIZE: f64 = 100.0;

const INNER_RADIUS_RATIO: f64 = 0.10;
const OUTER_RADIUS_RATIO: f64 = 0.30;
const OUTER2_RADIUS_RATIO: f64 = 0.46;
const BAND_MARGIN: f64 = 2.0;
const MARKER_INSET: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Converts polar coordinates around `(cx, cy)` to canvas coordinates.
#[inline]
pub fn polar_to_cartesian(cx: f64, cy: f64, r: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0) * PI / 180.0;
    Point {
        x: cx + r * rad.cos(),
        y: cy + r * rad.sin(),
    }
}

/// Radii and centre of a square wheel canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelGeometry {
    pub size: f64,
    pub cx: f64,
    pub cy: f64,
    pub inner_r: f64,
    pub outer_r: f64,
    pub outer2_r: f64,
    pub margin: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

impl WheelGeometry {
    pub fn new(size: f64) -> Self {
        let size = if size.is_finite() {
            size.max(MIN_CANVAS_SIZE)
        } else {
            DEFAULT_CANVAS_SIZE
        };
        Self {
            size,
            cx: size / 2.0,
            cy: size / 2.0,
            inner_r: size * INNER_RADIUS_RATIO,
            outer_r: size * OUTER_RADIUS_RATIO,
            outer2_r: size * OUTER2_RADIUS_RATIO,
            margin: BAND_MARGIN,
        }
    }

    #[inline]
    pub fn point(&self, r: f64, angle_deg: f64) -> Point {
        polar_to_cartesian(self.cx, self.cy, r, angle_deg)
    }

    /// Inner and outer radius of an intensity band.
    pub fn band_bounds(&self, band: IntensityBand) -> (f64, f64) {
        let start = self.outer_r + self.margin;
        let end = self.outer2_r - self.margin;
        let width = (end - start) / 3.0;
        let r0 = start + width * band.ring_index() as f64;
        (r0, r0 + width)
    }

    #[inline]
    pub fn band_mid(&self, band: IntensityBand) -> f64 {
        let (r0, r1) = self.band_bounds(band);
        (r0 + r1) / 2.0
    }

    /// Innermost radius a score-driven marker may take.
    #[inline]
    pub fn inner_marker_r(&self) -> f64 {
        self.inner_r + MARKER_INSET
    }

    /// Outermost radius a score-driven marker may take.
    #[inline]
    pub fn outer_marker_r(&self) -> f64 {
        self.outer2_r - MARKER_INSET
    }

    /// SVG path of the annular sector `r_inner..r_outer`, `start..end` degrees.
    pub fn sector_path(&self, r_inner: f64, r_outer: f64, start_deg: f64, end_deg: f64) -> String {
        let large_arc = if end_deg - start_deg > 180.0 { 1 } else { 0 };
        let o1 = self.point(r_outer, start_deg);
        let o2 = self.point(r_outer, end_deg);
        let i2 = self.point(r_inner, end_deg);
        let i1 = self.point(r_inner, start_deg);
        format!(
            "M{:.2},{:.2} A{:.2},{:.2} 0 {},1 {:.2},{:.2} L{:.2},{:.2} A{:.2},{:.2} 0 {},0 {:.2},{:.2} Z",
            o1.x, o1.y, r_outer, r_outer, large_arc, o2.x, o2.y,
            i2.x, i2.y, r_inner, r_inner, large_arc, i1.x, i1.y
        )
    }
}

/// Polar angle (degrees, 0° up, clockwise) and radius of `p` around the
/// wheel centre.
pub fn cartesian_to_polar(geometry: &WheelGeometry, p: Point) -> (f64, f64) {
    let dx = p.x - geometry.cx;
    let dy = p.y - geometry.cy;
    let r = (dx * dx + dy * dy).sqrt();
    let deg = (dy.atan2(dx) * 180.0 / PI + 90.0).rem_euclid(360.0);
    (deg, r)
}
