//! Conversation sessions as seen by the wheel pipeline.
//!
//! The backend owns sessions; this module only holds read-only copies.
//! Rows arrive as loosely-typed JSON ([`RawSession`]) and are validated
//! once at the fetch boundary into [`ConversationSession`], whose
//! `started_at` is always a real instant. Nothing downstream (selector,
//! renderer, summary) ever sees an unparseable timestamp.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use tracing::warn;

use super::emotion::{Resolution, normalize_key, resolve_optional};

/// Smallest fetch limit the backend accepts.
pub const MIN_FETCH_LIMIT: u16 = 1;
/// Largest fetch limit the backend accepts.
pub const MAX_FETCH_LIMIT: u16 = 500;
/// Fetch limit used when none is configured.
pub const DEFAULT_FETCH_LIMIT: u16 = 50;

// =============================================================================
// Timestamps
// =============================================================================

/// Parses an instant from RFC 3339, a naive ISO-8601 datetime (taken as
/// UTC), or integer epoch milliseconds.
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(instant) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(instant);
    }

    let naive = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    if let Ok(instant) = time::PrimitiveDateTime::parse(value, naive) {
        return Some(instant.assume_utc());
    }

    let millis: i64 = value.parse().ok()?;
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * 1_000_000).ok()
}

/// Formats an instant as RFC 3339.
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.unix_timestamp().to_string())
}

// =============================================================================
// Raw (wire) shape
// =============================================================================

/// Backend identifiers arrive either as integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Int(v) => write!(f, "{v}"),
            RawId::Text(v) => write!(f, "{v}"),
        }
    }
}

/// A session row exactly as the backend serializes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSession {
    pub id: Option<RawId>,
    pub patient: Option<RawId>,
    pub patient_name: Option<String>,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub patient_text: Option<String>,
    pub ai_response_text: Option<String>,
    pub emotion: Option<RawId>,
    pub emotion_name: Option<String>,
    pub emotion_key: Option<String>,
    pub emotion_reason: Option<String>,
    pub duration: Option<f64>,
    pub emotion_score: Option<f64>,
}

/// Why a raw row was rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("session has no id")]
    MissingId,
    #[error("session {0} has no started_at")]
    MissingStartedAt(String),
    #[error("session {id} has unparseable {field}: {value}")]
    InvalidTimestamp {
        id: String,
        field: &'static str,
        value: String,
    },
    #[error("session {0} ends before it starts")]
    EndsBeforeStart(String),
    #[error("malformed session row: {0}")]
    Malformed(String),
}

impl RawSession {
    /// Validates the row into a [`ConversationSession`].
    pub fn validate(self) -> Result<ConversationSession, SessionError> {
        let id = self.id.ok_or(SessionError::MissingId)?.to_string();

        let started_raw = self
            .started_at
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SessionError::MissingStartedAt(id.clone()))?;
        let started_at =
            parse_timestamp(&started_raw).ok_or_else(|| SessionError::InvalidTimestamp {
                id: id.clone(),
                field: "started_at",
                value: started_raw.clone(),
            })?;

        let ended_at = match self.ended_at.filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| {
                SessionError::InvalidTimestamp {
                    id: id.clone(),
                    field: "ended_at",
                    value: raw.clone(),
                }
            })?),
            None => None,
        };

        if ended_at.is_some_and(|ended| ended < started_at) {
            return Err(SessionError::EndsBeforeStart(id));
        }

        Ok(ConversationSession {
            id,
            patient: self.patient.map(|p| p.to_string()).unwrap_or_default(),
            patient_name: self.patient_name.filter(|n| !n.is_empty()),
            started_at,
            ended_at,
            patient_text: self.patient_text.unwrap_or_default(),
            ai_response_text: self.ai_response_text.unwrap_or_default(),
            emotion: EmotionRef {
                id: self.emotion.map(|e| e.to_string()),
                name: self.emotion_name.filter(|n| !n.trim().is_empty()),
                key: self.emotion_key.filter(|k| !k.trim().is_empty()),
            },
            emotion_reason: self.emotion_reason.unwrap_or_default(),
            duration_seconds: self.duration.filter(|d| d.is_finite() && *d >= 0.0),
            emotion_score: self.emotion_score.filter(|s| s.is_finite()),
            placeholder: false,
        })
    }
}

// =============================================================================
// Validated session
// =============================================================================

/// Emotion classification attached to a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionRef {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Taxonomy key as emitted by the classifier; may be unrecognized.
    pub key: Option<String>,
}

/// One completed (or still open) patient–AI exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    pub id: String,
    pub patient: String,
    pub patient_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    pub patient_text: String,
    pub ai_response_text: String,
    pub emotion: EmotionRef,
    pub emotion_reason: String,
    pub duration_seconds: Option<f64>,
    /// Classifier confidence/intensity in `[0, 1]` when provided.
    pub emotion_score: Option<f64>,
    /// True only for synthesized demo rows.
    #[serde(default)]
    pub placeholder: bool,
}

impl ConversationSession {
    /// Creates a session with only an id and start time set.
    pub fn new(id: impl Into<String>, started_at: OffsetDateTime) -> Self {
        Self {
            id: id.into(),
            patient: String::new(),
            patient_name: None,
            started_at,
            ended_at: None,
            patient_text: String::new(),
            ai_response_text: String::new(),
            emotion: EmotionRef::default(),
            emotion_reason: String::new(),
            duration_seconds: None,
            emotion_score: None,
            placeholder: false,
        }
    }

    /// Sets the emotion key and display name.
    pub fn with_emotion(mut self, key: impl Into<String>, name: Option<&str>) -> Self {
        self.emotion.key = Some(key.into());
        self.emotion.name = name.map(str::to_string);
        self
    }

    #[inline]
    pub fn with_score(mut self, score: f64) -> Self {
        self.emotion_score = Some(score);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.emotion_reason = reason.into();
        self
    }

    /// A session is active until it has an end time.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Reported duration, or the span between start and end.
    pub fn duration(&self) -> Option<f64> {
        self.duration_seconds.or_else(|| {
            self.ended_at
                .map(|ended| (ended - self.started_at).as_seconds_f64())
        })
    }

    /// Normalized emotion key, if any.
    #[inline]
    pub fn normalized_key(&self) -> Option<String> {
        self.emotion.key.as_deref().and_then(normalize_key)
    }

    /// Taxonomy resolution of this session's emotion key.
    #[inline]
    pub fn resolution(&self) -> Resolution {
        resolve_optional(self.emotion.key.as_deref())
    }

    /// Score clamped to `[0, 1]`.
    #[inline]
    pub fn clamped_score(&self) -> Option<f64> {
        self.emotion_score.map(|s| s.clamp(0.0, 1.0))
    }

    /// Display name, falling back to the key and then to `"unknown"`.
    pub fn display_name(&self) -> &str {
        self.emotion
            .name
            .as_deref()
            .or(self.emotion.key.as_deref())
            .unwrap_or("unknown")
    }
}

// =============================================================================
// Payload decoding
// =============================================================================

/// `GET /sessions` answers with either a bare array or a paginated object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionPayload {
    List(Vec<serde_json::Value>),
    Paged { results: Vec<serde_json::Value> },
}

impl SessionPayload {
    fn into_rows(self) -> Vec<serde_json::Value> {
        match self {
            SessionPayload::List(rows) => rows,
            SessionPayload::Paged { results } => results,
        }
    }
}

/// Validated sessions plus the number of rows dropped at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionBatch {
    pub sessions: Vec<ConversationSession>,
    pub rejected: usize,
}

impl SessionBatch {
    /// Validates every row; invalid rows are logged and counted, never propagated.
    pub fn from_payload(payload: SessionPayload) -> Self {
        let mut batch = SessionBatch::default();
        for row in payload.into_rows() {
            let validated = serde_json::from_value::<RawSession>(row)
                .map_err(|e| SessionError::Malformed(e.to_string()))
                .and_then(RawSession::validate);
            match validated {
                Ok(session) => batch.sessions.push(session),
                Err(e) => {
                    warn!("Rejecting session row: {}", e);
                    batch.rejected += 1;
                }
            }
        }
        batch
    }

    #[inline]
    pub fn from_sessions(sessions: Vec<ConversationSession>) -> Self {
        Self {
            sessions,
            rejected: 0,
        }
    }
}

// =============================================================================
// SelectionQuery
// =============================================================================

/// Sort order of the backend fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Asc),
            "desc" | "descending" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters of one backend fetch, independent of the in-memory view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionQuery {
    pub from: Option<OffsetDateTime>,
    pub to: Option<OffsetDateTime>,
    limit: u16,
    pub order: SortOrder,
}

impl Default for SelectionQuery {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            limit: DEFAULT_FETCH_LIMIT,
            order: SortOrder::Desc,
        }
    }
}

impl SelectionQuery {
    /// Creates a query with the limit clamped into `1..=500`.
    pub fn new(limit: u32, order: SortOrder) -> Self {
        Self {
            limit: clamp_fetch_limit(limit),
            order,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_range(mut self, from: Option<OffsetDateTime>, to: Option<OffsetDateTime>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    #[inline]
    pub const fn limit(&self) -> u16 {
        self.limit
    }

    /// Query-string pairs, omitting unset values.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(from) = self.from {
            pairs.push(("from", format_timestamp(from)));
        }
        if let Some(to) = self.to {
            pairs.push(("to", format_timestamp(to)));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("order", self.order.as_str().to_string()));
        pairs
    }
}

#[inline]
pub fn clamp_fetch_limit(limit: u32) -> u16 {
    limit.clamp(MIN_FETCH_LIMIT as u32, MAX_FETCH_LIMIT as u32) as u16
}
