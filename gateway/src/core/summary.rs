//! Per-emotion counts over a list of sessions.

use serde::Serialize;
use std::collections::HashMap;
use time::OffsetDateTime;

use super::session::ConversationSession;

/// Group key for sessions without a usable emotion key.
pub const UNKNOWN_KEY: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    /// Most recent non-empty display name seen for this key.
    pub name: String,
    pub count: usize,
    /// `count / total`, in `[0, 1]`.
    pub percentage: f64,
}

impl SummaryRow {
    /// Percentage rounded to a whole number for display.
    #[inline]
    pub fn rounded_percent(&self) -> u32 {
        rounded_percent(self.percentage)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionSummary {
    pub rows: Vec<SummaryRow>,
    pub total: usize,
    /// Key of the most frequent emotion. Ties go to the group seen first.
    pub top: Option<String>,
}

impl EmotionSummary {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn top_row(&self) -> Option<&SummaryRow> {
        self.rows.first()
    }
}

/// `fraction` in `[0, 1]` as a whole percentage.
pub fn rounded_percent(fraction: f64) -> u32 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

struct Group {
    key: String,
    name: Option<(OffsetDateTime, String)>,
    count: usize,
}

/// Aggregates sessions by normalized emotion key.
///
/// Rows are sorted by count descending; equal counts keep first-seen order.
/// An empty input yields the zero summary.
pub fn summarize<'a, I>(sessions: I) -> EmotionSummary
where
    I: IntoIterator<Item = &'a ConversationSession>,
{
    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for session in sessions {
        total += 1;
        let key = session
            .normalized_key()
            .unwrap_or_else(|| UNKNOWN_KEY.to_string());
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                name: None,
                count: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.count += 1;

        if let Some(name) = session
            .emotion
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            let newer = group
                .name
                .as_ref()
                .is_none_or(|(seen_at, _)| session.started_at >= *seen_at);
            if newer {
                group.name = Some((session.started_at, name.to_string()));
            }
        }
    }

    if total == 0 {
        return EmotionSummary::default();
    }

    // Vec::sort_by is stable.
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|g| SummaryRow {
            name: g.name.map(|(_, n)| n).unwrap_or_else(|| g.key.clone()),
            percentage: g.count as f64 / total as f64,
            count: g.count,
            key: g.key,
        })
        .collect();

    EmotionSummary {
        top: rows.first().map(|r| r.key.clone()),
        rows,
        total,
    }
}
