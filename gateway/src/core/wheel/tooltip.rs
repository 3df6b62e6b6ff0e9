//! Marker tooltips: what they say and where they go.

use serde::Serialize;
use time::UtcOffset;
use time::macros::format_description;

use super::geometry::Point;
use crate::core::session::ConversationSession;

/// Gap between pointer and tooltip box.
pub const TOOLTIP_OFFSET: f64 = 8.0;

/// Text shown when hovering a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipContent {
    pub title: String,
    /// `YYYY-MM-DD HH:MM` in UTC.
    pub timestamp: String,
    pub rationale: String,
}

impl TooltipContent {
    pub fn for_session(session: &ConversationSession) -> Self {
        let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
        let timestamp = session
            .started_at
            .to_offset(UtcOffset::UTC)
            .format(format)
            .unwrap_or_default();
        Self {
            title: session.display_name().to_string(),
            timestamp,
            rationale: session.emotion_reason.clone(),
        }
    }

    /// Single-line form used for SVG `<title>` elements.
    pub fn to_text(&self) -> String {
        if self.rationale.is_empty() {
            format!("{} ({})", self.title, self.timestamp)
        } else {
            format!("{} ({}): {}", self.title, self.timestamp, self.rationale)
        }
    }
}

/// Top-left corner for a `size` tooltip anchored at `pointer`, kept inside
/// `bounds`.
///
/// The box sits below-right of the pointer and flips to the other side on
/// each axis where it would overflow. A box larger than the bounds is pinned
/// to the origin.
pub fn place_tooltip(pointer: Point, size: (f64, f64), bounds: (f64, f64)) -> Point {
    Point {
        x: place_axis(pointer.x, size.0, bounds.0),
        y: place_axis(pointer.y, size.1, bounds.1),
    }
}

fn place_axis(anchor: f64, extent: f64, bound: f64) -> f64 {
    let mut start = anchor + TOOLTIP_OFFSET;
    if start + extent > bound {
        start = anchor - extent - TOOLTIP_OFFSET;
    }
    start.clamp(0.0, (bound - extent).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_content_from_session() {
        let session = ConversationSession::new("1", datetime!(2025-06-01 18:05:30 +09:00))
            .with_emotion("rage", Some("Rage"))
            .with_reason("raised voice");
        let content = TooltipContent::for_session(&session);
        assert_eq!(content.title, "Rage");
        assert_eq!(content.timestamp, "2025-06-01 09:05");
        assert_eq!(content.rationale, "raised voice");
        assert_eq!(content.to_text(), "Rage (2025-06-01 09:05): raised voice");
    }

    #[test]
    fn test_content_falls_back_to_unknown() {
        let session = ConversationSession::new("1", datetime!(2025-06-01 00:00 UTC));
        let content = TooltipContent::for_session(&session);
        assert_eq!(content.title, "unknown");
        assert_eq!(content.to_text(), "unknown (2025-06-01 00:00)");
    }

    #[test]
    fn test_placement_below_right_by_default() {
        let p = place_tooltip(Point { x: 50.0, y: 40.0 }, (100.0, 40.0), (300.0, 300.0));
        assert_eq!(p, Point { x: 58.0, y: 48.0 });
    }

    #[test]
    fn test_placement_flips_near_edges() {
        let p = place_tooltip(Point { x: 250.0, y: 280.0 }, (100.0, 40.0), (300.0, 300.0));
        assert_eq!(p, Point { x: 142.0, y: 232.0 });
    }

    #[test]
    fn test_placement_clamps_inside_bounds() {
        let p = place_tooltip(Point { x: 60.0, y: 10.0 }, (100.0, 40.0), (150.0, 300.0));
        // right overflows (168 > 150), left flips to -48, clamped to 0
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 18.0);

        let huge = place_tooltip(Point { x: 10.0, y: 10.0 }, (400.0, 400.0), (300.0, 300.0));
        assert_eq!(huge, Point { x: 0.0, y: 0.0 });
    }
}
