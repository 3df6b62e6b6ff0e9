//! Session selection: which sessions the wheel shows right now.
//!
//! ```text
//! sessions ──▶ filter ──▶ sort desc ──┬─ no cursor ────────────▶ take N
//!                                     ├─ cursor + Nearest ─────▶ sort by |Δt|, take N, sort desc
//!                                     └─ cursor + Causal ──────▶ keep ≤ cursor, take N
//! ```
//!
//! [`select`] is a pure function: same inputs, same output, no hidden state.
//! Sorts are stable, so sessions sharing a timestamp keep their input order.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

use super::emotion::{PrimaryEmotion, normalize_key, resolve_optional};
use super::session::ConversationSession;

/// URL prefix selecting a whole primary family (`primary:joy`).
pub const PRIMARY_FILTER_PREFIX: &str = "primary:";

// =============================================================================
// Emotion filter
// =============================================================================

/// Which sessions are eligible by emotion.
///
/// `ByKey` compares normalized keys literally, so `ByKey("joy")` does not
/// match an `"ecstasy"` session. `ByPrimary` matches the resolved primary
/// and does.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EmotionFilter {
    #[default]
    All,
    ByKey(String),
    ByPrimary(PrimaryEmotion),
}

impl EmotionFilter {
    /// Builds a key filter; blank keys mean [`EmotionFilter::All`].
    pub fn by_key(key: &str) -> Self {
        normalize_key(key).map_or(EmotionFilter::All, EmotionFilter::ByKey)
    }

    /// Parses the `emotion` URL parameter.
    ///
    /// `""`/`"all"` → `All`, `"primary:<name>"` → `ByPrimary` (falling back
    /// to a literal key when the name is not a primary), anything else →
    /// `ByKey`.
    pub fn parse(value: &str) -> Self {
        let Some(key) = normalize_key(value) else {
            return EmotionFilter::All;
        };
        if key == "all" {
            return EmotionFilter::All;
        }
        if let Some(name) = key.strip_prefix(PRIMARY_FILTER_PREFIX) {
            if let Some(primary) = PrimaryEmotion::from_str(name) {
                return EmotionFilter::ByPrimary(primary);
            }
        }
        EmotionFilter::ByKey(key)
    }

    /// Value for the `emotion` URL parameter; `None` for `All`.
    pub fn to_param(&self) -> Option<String> {
        match self {
            EmotionFilter::All => None,
            EmotionFilter::ByKey(key) => Some(key.clone()),
            EmotionFilter::ByPrimary(primary) => {
                Some(format!("{PRIMARY_FILTER_PREFIX}{}", primary.as_str()))
            }
        }
    }

    pub fn matches(&self, session: &ConversationSession) -> bool {
        match self {
            EmotionFilter::All => true,
            EmotionFilter::ByKey(key) => session.normalized_key().as_deref() == Some(key.as_str()),
            EmotionFilter::ByPrimary(primary) => {
                resolve_optional(session.emotion.key.as_deref()).primary == Some(*primary)
            }
        }
    }
}

impl fmt::Display for EmotionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_param() {
            Some(param) => write!(f, "{param}"),
            None => write!(f, "all"),
        }
    }
}

// =============================================================================
// Window policy
// =============================================================================

/// How a set cursor narrows the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// The `limit` sessions closest in time to the cursor, either side.
    Nearest,
    /// The `limit` most recent sessions at or before the cursor.
    #[default]
    Causal,
}

impl WindowPolicy {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            WindowPolicy::Nearest => "nearest",
            WindowPolicy::Causal => "causal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nearest" | "nearest_n" | "nearest-n" => Some(WindowPolicy::Nearest),
            "causal" | "backward" | "playback" => Some(WindowPolicy::Causal),
            _ => None,
        }
    }
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Selection
// =============================================================================

#[inline]
fn sort_most_recent_first(sessions: &mut [&ConversationSession]) {
    sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
}

/// Selects the sessions to display, most recent first.
///
/// Returns at most `limit` sessions and exactly
/// `min(limit, eligible)` of them. `limit == 0` yields nothing.
pub fn select<'a>(
    sessions: &'a [ConversationSession],
    cursor: Option<OffsetDateTime>,
    filter: &EmotionFilter,
    limit: usize,
    policy: WindowPolicy,
) -> Vec<&'a ConversationSession> {
    if limit == 0 {
        return Vec::new();
    }

    let mut eligible: Vec<&ConversationSession> =
        sessions.iter().filter(|s| filter.matches(s)).collect();
    sort_most_recent_first(&mut eligible);

    let Some(cursor) = cursor else {
        eligible.truncate(limit);
        return eligible;
    };

    match policy {
        WindowPolicy::Nearest => {
            eligible.sort_by_key(|s| (s.started_at - cursor).abs());
            eligible.truncate(limit);
            sort_most_recent_first(&mut eligible);
        }
        WindowPolicy::Causal => {
            eligible.retain(|s| s.started_at <= cursor);
            eligible.truncate(limit);
        }
    }
    eligible
}

// =============================================================================
// Timeline
// =============================================================================

/// Earliest and latest `started_at` of a session list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "time::serde::rfc3339")]
    pub min: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub max: OffsetDateTime,
}

impl TimeRange {
    /// Clamps a cursor into the range.
    #[inline]
    pub fn clamp(&self, cursor: OffsetDateTime) -> OffsetDateTime {
        cursor.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.min <= instant && instant <= self.max
    }
}

/// Range of the timeline slider; `None` when there are no sessions.
pub fn time_range(sessions: &[ConversationSession]) -> Option<TimeRange> {
    let min = sessions.iter().map(|s| s.started_at).min()?;
    let max = sessions.iter().map(|s| s.started_at).max()?;
    Some(TimeRange { min, max })
}

/// Clamps an optional cursor into the timeline. Without a range the cursor
/// is dropped, which means "latest".
pub fn clamp_cursor(
    cursor: Option<OffsetDateTime>,
    range: Option<&TimeRange>,
) -> Option<OffsetDateTime> {
    match (cursor, range) {
        (Some(c), Some(r)) => Some(r.clamp(c)),
        _ => None,
    }
}

/// One entry of the emotion filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub key: String,
    pub label: String,
}

/// Distinct emotion keys present in `sessions`, in first-seen order.
pub fn filter_options(sessions: &[ConversationSession]) -> Vec<FilterOption> {
    let mut options: Vec<FilterOption> = Vec::new();
    for session in sessions {
        let Some(key) = session.normalized_key() else {
            continue;
        };
        if options.iter().any(|o| o.key == key) {
            continue;
        }
        let label = session
            .emotion
            .name
            .clone()
            .unwrap_or_else(|| key.clone());
        options.push(FilterOption { key, label });
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00:00 UTC);

    fn at(hours_ago: i64, key: &str) -> ConversationSession {
        ConversationSession::new(format!("t-{hours_ago}h"), NOW - Duration::hours(hours_ago))
            .with_emotion(key, None)
    }

    /// T-0h joy, T-6h ecstasy, T-12h fear, T-18h sadness (shuffled input order).
    fn fixture() -> Vec<ConversationSession> {
        vec![at(12, "fear"), at(0, "joy"), at(18, "sadness"), at(6, "ecstasy")]
    }

    fn ids(selected: &[&ConversationSession]) -> Vec<String> {
        selected.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_latest_two_without_cursor() {
        let sessions = fixture();
        let selected = select(&sessions, None, &EmotionFilter::All, 2, WindowPolicy::Causal);
        assert_eq!(ids(&selected), vec!["t-0h", "t-6h"]);
    }

    #[test]
    fn test_key_filter_is_exact() {
        let sessions = fixture();
        let selected = select(
            &sessions,
            None,
            &EmotionFilter::by_key("joy"),
            10,
            WindowPolicy::Causal,
        );
        assert_eq!(ids(&selected), vec!["t-0h"]);
    }

    #[test]
    fn test_primary_filter_includes_family() {
        let sessions = fixture();
        let selected = select(
            &sessions,
            None,
            &EmotionFilter::ByPrimary(PrimaryEmotion::Joy),
            10,
            WindowPolicy::Causal,
        );
        assert_eq!(ids(&selected), vec!["t-0h", "t-6h"]);
    }

    #[test]
    fn test_key_filter_excludes_sessions_without_key() {
        let mut sessions = fixture();
        sessions.push(ConversationSession::new("no-key", NOW));
        let selected = select(
            &sessions,
            None,
            &EmotionFilter::by_key(" FEAR "),
            10,
            WindowPolicy::Causal,
        );
        assert_eq!(ids(&selected), vec!["t-12h"]);

        let all = select(&sessions, None, &EmotionFilter::All, 10, WindowPolicy::Causal);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn test_zero_limit_and_empty_input() {
        let sessions = fixture();
        for policy in [WindowPolicy::Causal, WindowPolicy::Nearest] {
            assert!(select(&sessions, None, &EmotionFilter::All, 0, policy).is_empty());
            assert!(select(&sessions, Some(NOW), &EmotionFilter::All, 0, policy).is_empty());
            assert!(select(&[], Some(NOW), &EmotionFilter::All, 5, policy).is_empty());
        }
    }

    #[test]
    fn test_fewer_than_limit_returns_all_without_padding() {
        let sessions = fixture();
        let selected = select(&sessions, None, &EmotionFilter::All, 50, WindowPolicy::Nearest);
        assert_eq!(ids(&selected), vec!["t-0h", "t-6h", "t-12h", "t-18h"]);
    }

    #[test]
    fn test_causal_window_looks_backward() {
        let sessions = fixture();
        let cursor = NOW - Duration::hours(7);
        let selected = select(&sessions, Some(cursor), &EmotionFilter::All, 2, WindowPolicy::Causal);
        assert_eq!(ids(&selected), vec!["t-12h", "t-18h"]);

        let on_boundary = NOW - Duration::hours(6);
        let selected = select(
            &sessions,
            Some(on_boundary),
            &EmotionFilter::All,
            1,
            WindowPolicy::Causal,
        );
        assert_eq!(ids(&selected), vec!["t-6h"]);
    }

    #[test]
    fn test_causal_window_before_first_session_is_empty() {
        let sessions = fixture();
        let cursor = NOW - Duration::hours(48);
        let selected = select(&sessions, Some(cursor), &EmotionFilter::All, 5, WindowPolicy::Causal);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_nearest_window_is_symmetric_and_recency_ordered() {
        let sessions = fixture();
        let cursor = NOW - Duration::hours(7);
        let selected = select(&sessions, Some(cursor), &EmotionFilter::All, 2, WindowPolicy::Nearest);
        // |Δ|: t-6h = 1h, t-12h = 5h, t-0h = 7h, t-18h = 11h
        assert_eq!(ids(&selected), vec!["t-6h", "t-12h"]);
    }

    #[test]
    fn test_nearest_ties_keep_recency_order() {
        let sessions = fixture();
        let cursor = NOW - Duration::hours(3);
        let selected = select(&sessions, Some(cursor), &EmotionFilter::All, 1, WindowPolicy::Nearest);
        // t-0h and t-6h are both 3h away; the more recent one wins.
        assert_eq!(ids(&selected), vec!["t-0h"]);
    }

    #[test]
    fn test_equal_timestamps_are_stable() {
        let sessions = vec![
            ConversationSession::new("a", NOW).with_emotion("joy", None),
            ConversationSession::new("b", NOW).with_emotion("joy", None),
            ConversationSession::new("c", NOW).with_emotion("joy", None),
        ];
        let selected = select(&sessions, None, &EmotionFilter::All, 3, WindowPolicy::Causal);
        assert_eq!(ids(&selected), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_output_properties_hold_across_inputs() {
        let keys = ["joy", "fear", "rage", "neutral", "ecstasy"];
        let sessions: Vec<ConversationSession> = (0..40)
            .map(|i: i64| {
                let hours = (i * 7919) % 97;
                ConversationSession::new(format!("s{i}"), NOW - Duration::hours(hours))
                    .with_emotion(keys[i as usize % keys.len()], None)
            })
            .collect();
        let filters = [
            EmotionFilter::All,
            EmotionFilter::by_key("joy"),
            EmotionFilter::ByPrimary(PrimaryEmotion::Anger),
        ];

        for filter in &filters {
            for limit in [1usize, 3, 10, 100] {
                for cursor in [None, Some(NOW - Duration::hours(40))] {
                    for policy in [WindowPolicy::Causal, WindowPolicy::Nearest] {
                        let selected = select(&sessions, cursor, filter, limit, policy);
                        let eligible = sessions
                            .iter()
                            .filter(|s| filter.matches(s))
                            .filter(|s| match (cursor, policy) {
                                (Some(c), WindowPolicy::Causal) => s.started_at <= c,
                                _ => true,
                            })
                            .count();
                        assert_eq!(selected.len(), limit.min(eligible));
                        assert!(selected.iter().all(|s| filter.matches(s)));
                        assert!(
                            selected
                                .windows(2)
                                .all(|w| w[0].started_at >= w[1].started_at)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_filter_parse_and_param() {
        assert_eq!(EmotionFilter::parse(""), EmotionFilter::All);
        assert_eq!(EmotionFilter::parse("ALL"), EmotionFilter::All);
        assert_eq!(EmotionFilter::parse(" Joy "), EmotionFilter::ByKey("joy".into()));
        assert_eq!(
            EmotionFilter::parse("primary:Anger"),
            EmotionFilter::ByPrimary(PrimaryEmotion::Anger)
        );
        assert_eq!(
            EmotionFilter::parse("primary:rage"),
            EmotionFilter::ByKey("primary:rage".into())
        );

        for filter in [
            EmotionFilter::All,
            EmotionFilter::ByKey("jealousy".into()),
            EmotionFilter::ByPrimary(PrimaryEmotion::Trust),
        ] {
            let param = filter.to_param().unwrap_or_default();
            assert_eq!(EmotionFilter::parse(&param), filter);
        }
    }

    #[test]
    fn test_window_policy_from_str() {
        assert_eq!(WindowPolicy::from_str("Nearest"), Some(WindowPolicy::Nearest));
        assert_eq!(WindowPolicy::from_str("causal"), Some(WindowPolicy::Causal));
        assert_eq!(WindowPolicy::from_str("random"), None);
        assert_eq!(WindowPolicy::default(), WindowPolicy::Causal);
    }

    #[test]
    fn test_time_range_and_clamp() {
        let sessions = fixture();
        let range = time_range(&sessions).unwrap();
        assert_eq!(range.max, NOW);
        assert_eq!(range.min, NOW - Duration::hours(18));

        let future = NOW + Duration::days(1);
        assert_eq!(clamp_cursor(Some(future), Some(&range)), Some(NOW));
        let past = NOW - Duration::days(5);
        assert_eq!(clamp_cursor(Some(past), Some(&range)), Some(range.min));
        assert_eq!(clamp_cursor(Some(NOW), None), None);
        assert!(time_range(&[]).is_none());
    }

    #[test]
    fn test_filter_options_first_seen_order() {
        let sessions = vec![
            at(0, "joy").with_emotion("joy", Some("Joy")),
            at(1, "Fear"),
            at(2, "joy"),
            ConversationSession::new("blank", NOW),
        ];
        let options = filter_options(&sessions);
        assert_eq!(
            options,
            vec![
                FilterOption { key: "joy".into(), label: "Joy".into() },
                FilterOption { key: "fear".into(), label: "fear".into() },
            ]
        );
    }
}
