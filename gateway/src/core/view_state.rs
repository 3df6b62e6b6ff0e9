//! Transient view state of the emotion page and its URL mirror.
//!
//! [`ViewState`] is an explicit value. It only changes through
//! [`ViewState::apply`], which takes a discrete [`ViewEvent`] and returns the
//! next state; nothing mutates it in place.
//!
//! [`PageParams`] mirrors the state into query parameters:
//!
//! | Param | Meaning | Default |
//! |-------|---------|---------|
//! | `limit` | display count (10, 25, 50) | 10 |
//! | `order` | fetch order (`asc`/`desc`) | `desc` |
//! | `cursor` | RFC 3339 or epoch ms | unset (latest) |
//! | `emotion` | `all`, a key, or `primary:<name>` | `all` |
//! | `from` / `to` | fetch range | unset |

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use url::form_urlencoded;

use super::selector::{EmotionFilter, TimeRange};
use super::session::{
    SelectionQuery, SortOrder, clamp_fetch_limit, format_timestamp, parse_timestamp,
};

// =============================================================================
// Display limit
// =============================================================================

/// How many sessions the wheel shows at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum DisplayLimit {
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl DisplayLimit {
    #[inline]
    pub const fn all() -> &'static [DisplayLimit; 3] {
        &[
            DisplayLimit::Ten,
            DisplayLimit::TwentyFive,
            DisplayLimit::Fifty,
        ]
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        match self {
            DisplayLimit::Ten => 10,
            DisplayLimit::TwentyFive => 25,
            DisplayLimit::Fifty => 50,
        }
    }

    /// Exact match against the enumerated choices.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            10 => Some(DisplayLimit::Ten),
            25 => Some(DisplayLimit::TwentyFive),
            50 => Some(DisplayLimit::Fifty),
            _ => None,
        }
    }

    /// Parses the `limit` URL parameter; anything invalid yields the default.
    pub fn parse_param(value: &str) -> Self {
        value
            .trim()
            .parse()
            .ok()
            .and_then(Self::from_value)
            .unwrap_or_default()
    }
}

impl From<DisplayLimit> for u32 {
    fn from(limit: DisplayLimit) -> Self {
        limit.get()
    }
}

impl TryFrom<u32> for DisplayLimit {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        DisplayLimit::from_value(value)
            .ok_or_else(|| format!("Invalid display limit {value}: expected 10, 25 or 50"))
    }
}

impl fmt::Display for DisplayLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// =============================================================================
// ViewState + reducer
// =============================================================================

/// Client-side view state: what the clinician is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ViewState {
    /// `None` means "latest".
    #[serde(with = "time::serde::rfc3339::option")]
    pub cursor: Option<OffsetDateTime>,
    pub filter: EmotionFilter,
    pub limit: DisplayLimit,
    pub order: SortOrder,
}

/// A discrete user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    CursorMoved(OffsetDateTime),
    CursorCleared,
    FilterChanged(EmotionFilter),
    LimitChanged(DisplayLimit),
    OrderChanged(SortOrder),
}

impl ViewState {
    /// Returns the state after `event`.
    pub fn apply(&self, event: ViewEvent) -> ViewState {
        let mut next = self.clone();
        match event {
            ViewEvent::CursorMoved(at) => next.cursor = Some(at),
            ViewEvent::CursorCleared => next.cursor = None,
            ViewEvent::FilterChanged(filter) => next.filter = filter,
            ViewEvent::LimitChanged(limit) => next.limit = limit,
            ViewEvent::OrderChanged(order) => next.order = order,
        }
        next
    }

    /// Returns the state with its cursor clamped into `range`.
    ///
    /// With no data there is nothing to scrub, so the cursor is cleared.
    pub fn clamped(&self, range: Option<&TimeRange>) -> ViewState {
        match (self.cursor, range) {
            (Some(cursor), Some(range)) => self.apply(ViewEvent::CursorMoved(range.clamp(cursor))),
            (Some(_), None) => self.apply(ViewEvent::CursorCleared),
            (None, _) => self.clone(),
        }
    }
}

// =============================================================================
// URL mirror
// =============================================================================

/// View state plus fetch range, as carried in the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageParams {
    pub view: ViewState,
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
}

impl PageParams {
    /// Parses a raw query string. Unknown keys are ignored; invalid values
    /// fall back to their defaults.
    pub fn parse(query: &str) -> Self {
        Self::parse_with_limit(query, DisplayLimit::default())
    }

    /// Like [`PageParams::parse`], but an absent `limit` yields
    /// `default_limit`. An invalid one still falls back to 10.
    pub fn parse_with_limit(query: &str, default_limit: DisplayLimit) -> Self {
        let mut params = PageParams::default();
        params.view.limit = default_limit;
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "limit" => params.view.limit = DisplayLimit::parse_param(&value),
                "order" => params.view.order = SortOrder::from_str(&value).unwrap_or_default(),
                "cursor" => params.view.cursor = parse_timestamp(&value),
                "emotion" => params.view.filter = EmotionFilter::parse(&value),
                "from" => params.from = parse_timestamp(&value),
                "to" => params.to = parse_timestamp(&value),
                _ => {}
            }
        }
        params
    }

    /// Canonical query string. `limit` and `order` are always present,
    /// everything else only when set.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("limit", &self.view.limit.to_string());
        serializer.append_pair("order", self.view.order.as_str());
        if let Some(cursor) = self.view.cursor {
            serializer.append_pair("cursor", &format_timestamp(cursor));
        }
        if let Some(emotion) = self.view.filter.to_param() {
            serializer.append_pair("emotion", &emotion);
        }
        if let Some(from) = self.from {
            serializer.append_pair("from", &format_timestamp(from));
        }
        if let Some(to) = self.to {
            serializer.append_pair("to", &format_timestamp(to));
        }
        serializer.finish()
    }

    /// Backend query for this page. Fetches at least as many rows as are
    /// displayed.
    pub fn fetch_query(&self, fetch_limit: u16) -> SelectionQuery {
        let limit = (fetch_limit as u32).max(self.view.limit.get());
        SelectionQuery::new(clamp_fetch_limit(limit) as u32, self.view.order)
            .with_range(self.from, self.to)
    }
}
