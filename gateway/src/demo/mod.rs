//! Synthetic sessions for previewing the wheel without a backend.
//!
//! Enabled with `backend.demo_mode` / `DEMO_MODE=true`. Every generated
//! session is tagged `placeholder: true` and the renderer draws it with a
//! distinct marker class. Output is deterministic for a given patient id and
//! anchor time.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::backend::{BackendError, SessionSource};
use crate::core::emotion::resolve_primary;
use crate::core::session::{ConversationSession, SelectionQuery, SessionBatch, SortOrder};

/// Sessions generated per patient before query filtering.
pub const DEFAULT_DEMO_SESSIONS: usize = 60;

/// Spacing between consecutive demo sessions.
const STEP_MINUTES: i64 = 6 * 60;

const VOCABULARY: &[(&str, &str)] = &[
    ("joy", "Joy"),
    ("serenity", "Serenity"),
    ("trust", "Trust"),
    ("acceptance", "Acceptance"),
    ("fear", "Fear"),
    ("apprehension", "Apprehension"),
    ("surprise", "Surprise"),
    ("sadness", "Sadness"),
    ("pensiveness", "Pensiveness"),
    ("disgust", "Disgust"),
    ("anger", "Anger"),
    ("annoyance", "Annoyance"),
    ("rage", "Rage"),
    ("anticipation", "Anticipation"),
    ("interest", "Interest"),
    ("ecstasy", "Ecstasy"),
    ("optimism", "Optimism"),
    ("neutral", "Neutral"),
];

const REASONS: &[&str] = &[
    "Talked about a good day at work",
    "Mentioned trouble sleeping",
    "Looking forward to the weekend",
    "Frustrated with a delayed appointment",
    "Reflected on a recent loss",
    "Felt supported by family",
];

/// Generator seeded from an FNV-1a fold of the patient id.
fn seeded_rng(patient_id: &str) -> StdRng {
    let seed = patient_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
    StdRng::seed_from_u64(seed)
}

#[derive(Debug, Clone)]
pub struct DemoSource {
    anchor: Option<OffsetDateTime>,
    total: usize,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            anchor: None,
            total: DEFAULT_DEMO_SESSIONS,
        }
    }

    /// Pins the newest generated session to `anchor` instead of "now".
    pub fn with_anchor(mut self, anchor: OffsetDateTime) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    /// All sessions for `patient_id`, most recent first.
    pub fn generate(&self, patient_id: &str) -> Vec<ConversationSession> {
        let anchor = self.anchor.unwrap_or_else(|| {
            let now = OffsetDateTime::now_utc();
            now.replace_nanosecond(0).unwrap_or(now)
        });
        let mut rng = seeded_rng(patient_id);
        let id_base = (rng.next_u64() as u128) << 64;

        (0..self.total)
            .map(|i| {
                let (key, name) = VOCABULARY[rng.gen_range(0..VOCABULARY.len())];
                let jitter: i64 = rng.gen_range(0..90);
                let started_at = anchor - Duration::minutes(i as i64 * STEP_MINUTES + jitter);
                let minutes: i64 = rng.gen_range(5..45);
                let score: f64 = rng.gen_range(0.2..=1.0);

                let id = Uuid::from_u128(id_base | i as u128).to_string();
                let mut session = ConversationSession::new(id, started_at)
                    .with_emotion(key, Some(name))
                    .with_reason(REASONS[rng.gen_range(0..REASONS.len())]);
                if resolve_primary(key).is_some() {
                    session = session.with_score((score * 100.0).round() / 100.0);
                }
                session.patient = patient_id.to_string();
                session.ended_at = (i > 0).then(|| started_at + Duration::minutes(minutes));
                session.placeholder = true;
                session
            })
            .collect()
    }
}

#[async_trait]
impl SessionSource for DemoSource {
    async fn fetch_sessions(
        &self,
        patient_id: &str,
        query: &SelectionQuery,
    ) -> Result<SessionBatch, BackendError> {
        let mut sessions: Vec<ConversationSession> = self
            .generate(patient_id)
            .into_iter()
            .filter(|s| query.from.is_none_or(|from| s.started_at >= from))
            .filter(|s| query.to.is_none_or(|to| s.started_at <= to))
            .collect();
        if query.order == SortOrder::Asc {
            sessions.reverse();
        }
        sessions.truncate(query.limit() as usize);
        Ok(SessionBatch::from_sessions(sessions))
    }

    fn name(&self) -> &'static str {
        "demo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn source() -> DemoSource {
        DemoSource::new().with_anchor(datetime!(2025-06-01 12:00 UTC))
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = source().generate("patient-1");
        let b = source().generate("patient-1");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DEMO_SESSIONS);
        assert_ne!(a, source().generate("patient-2"));
    }

    #[test]
    fn test_sessions_are_placeholders_most_recent_first() {
        let sessions = source().generate("p");
        assert!(sessions.iter().all(|s| s.placeholder));
        assert!(sessions.windows(2).all(|w| w[0].started_at > w[1].started_at));
        let anchor = datetime!(2025-06-01 12:00 UTC);
        assert!(sessions[0].started_at <= anchor);
        assert!(anchor - sessions[0].started_at < Duration::minutes(90));
        assert!(sessions[0].is_active());
        assert!(sessions[1..].iter().all(|s| !s.is_active()));
    }

    #[tokio::test]
    async fn test_fetch_honours_query() {
        let query = SelectionQuery::new(5, SortOrder::Asc);
        let batch = source().fetch_sessions("p", &query).await.unwrap();
        assert_eq!(batch.sessions.len(), 5);
        assert_eq!(batch.rejected, 0);
        assert!(batch.sessions.windows(2).all(|w| w[0].started_at < w[1].started_at));

        let from = datetime!(2025-05-31 12:00 UTC);
        let query = SelectionQuery::new(500, SortOrder::Desc).with_range(Some(from), None);
        let batch = source().fetch_sessions("p", &query).await.unwrap();
        assert!(!batch.sessions.is_empty());
        assert!(batch.sessions.iter().all(|s| s.started_at >= from));
    }

    #[test]
    fn test_generated_values_stay_in_range() {
        let sessions = source().with_total(200).generate("range-check");
        for s in &sessions {
            match s.resolution().primary {
                Some(_) => {
                    let score = s.emotion_score.unwrap();
                    assert!((0.2..=1.0).contains(&score), "{score}");
                }
                None => assert!(s.emotion_score.is_none()),
            }
        }
        let mut ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
