//! Legend entries shown next to the wheel.

use serde::Serialize;

use crate::core::emotion::{IntensityBand, PrimaryEmotion};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryLegendEntry {
    pub key: PrimaryEmotion,
    pub label: &'static str,
    pub label_ja: &'static str,
    pub color: &'static str,
    pub angle: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandLegendEntry {
    pub band: IntensityBand,
    /// 0 = innermost ring.
    pub ring: usize,
    pub description: &'static str,
    pub description_ja: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub primaries: Vec<PrimaryLegendEntry>,
    pub bands: Vec<BandLegendEntry>,
}

/// The fixed legend: 8 primaries in wheel order, 3 bands inner to outer.
pub fn legend() -> Legend {
    Legend {
        primaries: PrimaryEmotion::all()
            .iter()
            .map(|p| PrimaryLegendEntry {
                key: *p,
                label: p.label(),
                label_ja: p.label_ja(),
                color: p.base_color(),
                angle: p.angle(),
            })
            .collect(),
        bands: IntensityBand::all()
            .iter()
            .map(|b| BandLegendEntry {
                band: *b,
                ring: b.ring_index(),
                description: b.description(),
                description_ja: b.description_ja(),
            })
            .collect(),
    }
}
