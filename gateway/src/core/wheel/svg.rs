//! SVG serialization of a [`WheelScene`].

use quick_xml::escape::escape;
use std::fmt::Write;

use super::layout::WheelScene;

/// Renders the scene as a standalone SVG document.
///
/// Drawing order is bands, then wedges, then markers, so markers stay on top.
/// Markers are emitted oldest first for the same reason: the most recent
/// session ends up uppermost.
pub fn render_svg(scene: &WheelScene) -> String {
    let size = scene.geometry.size;
    let mut bands = String::new();
    let mut wedges = String::new();
    let mut markers = String::new();

    for band in &scene.bands {
        let _ = write!(
            bands,
            r##"<path class="band band-{}" d="{}" fill="{}" stroke="#ffffff" stroke-width="1"/>"##,
            band.intensity,
            band.path,
            escape(band.color.as_str()),
        );
    }

    for wedge in &scene.wedges {
        let class = if wedge.active { "wedge active" } else { "wedge" };
        let _ = write!(
            wedges,
            r##"<g class="{class}" data-primary="{primary}"><path d="{path}" fill="{color}" fill-opacity="{opacity}" stroke="#ffffff" stroke-width="1"><title>{label}</title></path><text x="{x:.2}" y="{y:.2}" text-anchor="middle" dominant-baseline="middle" font-size="{font:.1}" fill="#374151">{label_ja}</text></g>"##,
            primary = wedge.primary,
            path = wedge.path,
            color = wedge.color,
            opacity = wedge.opacity,
            label = escape(wedge.label),
            x = wedge.label_position.x,
            y = wedge.label_position.y,
            font = (size * 0.035).max(8.0),
            label_ja = escape(wedge.label_ja),
        );
    }

    for marker in scene.markers.iter().rev() {
        let class = if marker.placeholder {
            "marker placeholder"
        } else {
            "marker"
        };
        let _ = write!(
            markers,
            r##"<circle class="{class}" data-session="{id}" cx="{x:.2}" cy="{y:.2}" r="{r:.2}" fill="{color}" fill-opacity="{opacity:.2}" stroke="#1f2937" stroke-width="1"><title>{title}</title></circle>"##,
            id = escape(marker.session_id.as_str()),
            x = marker.position.x,
            y = marker.position.y,
            r = marker.size,
            color = escape(marker.color.as_str()),
            opacity = marker.opacity,
            title = escape(marker.tooltip.to_text().as_str()),
        );
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}" role="img" aria-label="Plutchik emotion wheel"><g class="bands">{bands}</g><g class="wedges">{wedges}</g><g class="markers">{markers}</g></svg>"##
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::ConversationSession;
    use crate::core::wheel::layout::{RenderOptions, render};
    use time::macros::datetime;

    #[test]
    fn test_empty_scene_document() {
        let svg = render_svg(&render(&[], &RenderOptions::default()));
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="300""#));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"<g class="wedge""#).count(), 8);
        assert_eq!(svg.matches(r#"class="band "#).count(), 24);
        assert_eq!(svg.matches("<circle").count(), 0);
        assert!(svg.contains("喜び"));
    }

    #[test]
    fn test_markers_and_active_wedge() {
        let session = ConversationSession::new("42", datetime!(2025-06-01 12:00 UTC))
            .with_emotion("rage", Some("Rage"))
            .with_score(0.9);
        let svg = render_svg(&render(&[&session], &RenderOptions::default()));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains(r#"data-session="42""#));
        assert!(svg.contains(r#"<g class="wedge active" data-primary="anger">"#));
        assert!(svg.contains("<title>Rage (2025-06-01 12:00)</title>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let session = ConversationSession::new("<id>", datetime!(2025-06-01 12:00 UTC))
            .with_emotion("joy", Some("Joy & <b>relief</b>"))
            .with_reason(r#"said "thanks""#);
        let svg = render_svg(&render(&[&session], &RenderOptions::default()));
        assert!(!svg.contains("<b>"));
        assert!(svg.contains("Joy &amp; &lt;b&gt;relief&lt;/b&gt;"));
        assert!(svg.contains(r#"data-session="&lt;id&gt;""#));
        assert!(svg.contains("&quot;thanks&quot;"));
    }

    #[test]
    fn test_placeholder_markers_are_tagged() {
        let mut session = ConversationSession::new("demo-1", datetime!(2025-06-01 12:00 UTC))
            .with_emotion("trust", None);
        session.placeholder = true;
        let svg = render_svg(&render(&[&session], &RenderOptions::default()));
        assert!(svg.contains(r#"class="marker placeholder""#));
    }
}
