//! Everything the emotion page needs, computed from one session list.

use serde::Serialize;

use super::selector::{
    FilterOption, TimeRange, WindowPolicy, filter_options, select, time_range,
};
use super::session::ConversationSession;
use super::summary::{EmotionSummary, summarize};
use super::view_state::{PageParams, ViewState};
use super::wheel::{Legend, RenderOptions, WheelScene, legend, render};

#[derive(Debug, Clone, Serialize)]
pub struct EmotionPage {
    /// Effective view after cursor clamping.
    pub view: ViewState,
    /// Canonical query string for the effective view.
    pub query: String,
    /// Selected sessions, most recent first.
    pub selected: Vec<ConversationSession>,
    pub scene: WheelScene,
    /// Summary over `selected`.
    pub summary: EmotionSummary,
    pub legend: Legend,
    pub filter_options: Vec<FilterOption>,
    pub time_range: Option<TimeRange>,
    /// Sessions available before selection.
    pub total: usize,
}

/// Runs clamp → select → render → summarize for one request.
pub fn build_page(
    sessions: &[ConversationSession],
    params: &PageParams,
    policy: WindowPolicy,
    options: &RenderOptions,
) -> EmotionPage {
    let range = time_range(sessions);
    let view = params.view.clamped(range.as_ref());
    let selected = select(
        sessions,
        view.cursor,
        &view.filter,
        view.limit.get() as usize,
        policy,
    );
    let scene = render(&selected, options);
    let summary = summarize(selected.iter().copied());
    let query = PageParams {
        view: view.clone(),
        from: params.from,
        to: params.to,
    }
    .to_query_string();

    EmotionPage {
        view,
        query,
        selected: selected.into_iter().cloned().collect(),
        scene,
        summary,
        legend: legend(),
        filter_options: filter_options(sessions),
        time_range: range,
        total: sessions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::emotion::PrimaryEmotion;
    use crate::core::selector::EmotionFilter;
    use time::Duration;
    use time::macros::datetime;

    fn sessions() -> Vec<ConversationSession> {
        let t = datetime!(2025-06-01 12:00 UTC);
        vec![
            ConversationSession::new("a", t).with_emotion("joy", Some("Joy")),
            ConversationSession::new("b", t - Duration::hours(6)).with_emotion("ecstasy", None),
            ConversationSession::new("c", t - Duration::hours(12)).with_emotion("fear", None),
            ConversationSession::new("d", t - Duration::hours(18)).with_emotion("sadness", None),
        ]
    }

    fn ids(page: &EmotionPage) -> Vec<&str> {
        page.selected.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_default_page() {
        let page = build_page(
            &sessions(),
            &PageParams::default(),
            WindowPolicy::Causal,
            &RenderOptions::default(),
        );
        assert_eq!(ids(&page), vec!["a", "b", "c", "d"]);
        assert_eq!(page.total, 4);
        assert_eq!(page.scene.wedges.len(), 8);
        assert_eq!(page.scene.markers.len(), 4);
        assert_eq!(page.summary.total, 4);
        assert_eq!(page.filter_options.len(), 4);
        assert_eq!(page.query, "limit=10&order=desc");
        let active: Vec<_> = page.scene.wedges.iter().filter(|w| w.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].primary, PrimaryEmotion::Joy);
    }

    #[test]
    fn test_cursor_is_clamped_into_range() {
        let params = PageParams::parse("cursor=2030-01-01T00:00:00Z&emotion=primary:joy");
        let page = build_page(
            &sessions(),
            &params,
            WindowPolicy::Causal,
            &RenderOptions::default(),
        );
        assert_eq!(page.view.cursor, Some(datetime!(2025-06-01 12:00 UTC)));
        assert_eq!(
            page.view.filter,
            EmotionFilter::ByPrimary(PrimaryEmotion::Joy)
        );
        assert_eq!(ids(&page), vec!["a", "b"]);
        assert!(page.query.contains("cursor=2025-06-01T12%3A00%3A00Z"));
    }

    #[test]
    fn test_empty_page() {
        let page = build_page(
            &[],
            &PageParams::parse("cursor=2025-06-01T00:00:00Z"),
            WindowPolicy::Nearest,
            &RenderOptions::default(),
        );
        assert!(page.selected.is_empty());
        assert_eq!(page.scene.wedges.len(), 8);
        assert!(page.scene.wedges.iter().all(|w| !w.active));
        assert!(page.scene.markers.is_empty());
        assert!(page.summary.is_empty());
        assert_eq!(page.view.cursor, None);
        assert_eq!(page.time_range, None);
    }
}
