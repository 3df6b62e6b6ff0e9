//! Static taxonomy and legend endpoints.

use axum::{Json, response::IntoResponse};
use serde::Serialize;

use crate::core::emotion::{
    CANONICAL_TABLE, EXTENDED_TABLE, IntensityBand, PrimaryEmotion, band_color,
};
use crate::core::wheel::legend;

#[derive(Debug, Serialize)]
pub struct PrimaryInfo {
    pub key: PrimaryEmotion,
    pub label: &'static str,
    pub label_ja: &'static str,
    pub color: &'static str,
    pub angle: f64,
    pub weak: &'static str,
    pub strong: &'static str,
    /// Shaded colour per band, inner to outer.
    pub band_colors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SynonymInfo {
    pub key: &'static str,
    pub primary: PrimaryEmotion,
    pub intensity: IntensityBand,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub primaries: Vec<PrimaryInfo>,
    pub bands: Vec<IntensityBand>,
    pub synonyms: Vec<SynonymInfo>,
}

fn taxonomy() -> TaxonomyResponse {
    TaxonomyResponse {
        primaries: CANONICAL_TABLE
            .iter()
            .map(|entry| PrimaryInfo {
                key: entry.primary,
                label: entry.primary.label(),
                label_ja: entry.primary.label_ja(),
                color: entry.primary.base_color(),
                angle: entry.primary.angle(),
                weak: entry.weak,
                strong: entry.strong,
                band_colors: IntensityBand::all()
                    .iter()
                    .map(|band| band_color(entry.primary, *band))
                    .collect(),
            })
            .collect(),
        bands: IntensityBand::all().to_vec(),
        synonyms: EXTENDED_TABLE
            .iter()
            .map(|&(key, primary, intensity)| SynonymInfo {
                key,
                primary,
                intensity,
            })
            .collect(),
    }
}

/// `GET /taxonomy`
pub async fn get_taxonomy() -> impl IntoResponse {
    Json(taxonomy())
}

/// `GET /legend`
pub async fn get_legend() -> impl IntoResponse {
    Json(legend())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_shape() {
        let taxonomy = taxonomy();
        assert_eq!(taxonomy.primaries.len(), 8);
        assert_eq!(taxonomy.bands.len(), 3);
        assert_eq!(taxonomy.synonyms.len(), EXTENDED_TABLE.len());

        let anger = &taxonomy.primaries[PrimaryEmotion::Anger.index()];
        assert_eq!(anger.weak, "annoyance");
        assert_eq!(anger.strong, "rage");
        assert_eq!(anger.band_colors.len(), 3);
        assert_eq!(anger.band_colors[1], "#FF6B6B");
    }
}
