//! Session feed: one backend request per API call, with a last-good cache.
//!
//! ```text
//! fetch(patient, query)
//!   │  generation[patient] = next ticket
//!   ▼
//! source.fetch_sessions ──ok──► still newest for patient? ──yes──► commit to cache
//!   │                                    └─no──► return without committing
//!   └─err──► stale_on_error && cache hit? ──yes──► cached batch, stale = true
//!                                └─no──► BackendError
//! ```
//!
//! Superseded results still go back to their own caller; they just never
//! overwrite what a newer request for the same patient committed.
//!
//! Tickets come from one counter shared by all patients, and a patient's
//! entry is dropped once its newest request settles, so the map only holds
//! patients with a request in flight. Cached batches expire after the TTL;
//! once expired they can no longer be served stale.

use moka::future::Cache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::backend::{BackendError, SessionSource};
use crate::core::session::{SelectionQuery, SessionBatch};

type FeedKey = (String, SelectionQuery);

/// Outcome of one feed fetch.
#[derive(Debug, Clone)]
pub struct FeedResult {
    pub batch: Arc<SessionBatch>,
    /// True when `batch` is a cached result served because the backend failed.
    pub stale: bool,
    /// Backend error message when `stale` is set.
    pub error: Option<String>,
}

pub struct SessionFeed {
    source: Arc<dyn SessionSource>,
    cache: Cache<FeedKey, Arc<SessionBatch>>,
    /// Newest ticket per patient with a request in flight.
    generations: Mutex<HashMap<String, u64>>,
    next_ticket: AtomicU64,
    stale_on_error: bool,
}

impl SessionFeed {
    pub fn new(
        source: Arc<dyn SessionSource>,
        ttl: Duration,
        capacity: u64,
        stale_on_error: bool,
    ) -> Self {
        info!(
            "Session feed using {} source (ttl={}s, capacity={}, stale_on_error={})",
            source.name(),
            ttl.as_secs(),
            capacity,
            stale_on_error
        );
        Self {
            source,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            generations: Mutex::new(HashMap::new()),
            next_ticket: AtomicU64::new(0),
            stale_on_error,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    fn begin(&self, patient_id: &str) -> u64 {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        self.generations.lock().insert(patient_id.to_string(), ticket);
        ticket
    }

    /// True when `ticket` is still the patient's newest request; that entry
    /// is released.
    fn settle(&self, patient_id: &str, ticket: u64) -> bool {
        let mut generations = self.generations.lock();
        if generations.get(patient_id).copied() == Some(ticket) {
            generations.remove(patient_id);
            true
        } else {
            false
        }
    }

    /// Last committed batch for `patient_id` and `query`, if still cached.
    pub async fn cached(&self, patient_id: &str, query: &SelectionQuery) -> Option<Arc<SessionBatch>> {
        self.cache.get(&(patient_id.to_string(), *query)).await
    }

    /// Fetches sessions, applying the latest-wins and stale-while-error rules.
    pub async fn fetch(
        &self,
        patient_id: &str,
        query: &SelectionQuery,
    ) -> Result<FeedResult, BackendError> {
        let ticket = self.begin(patient_id);
        let key: FeedKey = (patient_id.to_string(), *query);

        let fetched = self.source.fetch_sessions(patient_id, query).await;
        let current = self.settle(patient_id, ticket);
        match fetched {
            Ok(batch) => {
                let batch = Arc::new(batch);
                if current {
                    self.cache.insert(key, batch.clone()).await;
                } else {
                    warn!(
                        "Result for patient {} superseded by a newer request; not caching",
                        patient_id
                    );
                }
                Ok(FeedResult {
                    batch,
                    stale: false,
                    error: None,
                })
            }
            Err(e) => {
                error!("Failed to fetch sessions for patient {}: {}", patient_id, e);
                if !self.stale_on_error {
                    return Err(e);
                }
                match self.cache.get(&key).await {
                    Some(cached) => {
                        warn!("Serving stale sessions for patient {}", patient_id);
                        Ok(FeedResult {
                            batch: cached,
                            stale: true,
                            error: Some(e.to_string()),
                        })
                    }
                    None => Err(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::{ConversationSession, SortOrder};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use time::macros::datetime;

    /// Returns `limit` sessions after sleeping `limit` milliseconds, or fails
    /// while `failing` is set.
    struct ScriptedSource {
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                failing: AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SessionSource for ScriptedSource {
        async fn fetch_sessions(
            &self,
            _patient_id: &str,
            query: &SelectionQuery,
        ) -> Result<SessionBatch, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(query.limit() as u64)).await;
            if self.failing.load(Ordering::SeqCst) {
                return Err(BackendError::Network("connection refused".to_string()));
            }
            let sessions = (0..query.limit())
                .map(|i| ConversationSession::new(i.to_string(), datetime!(2025-06-01 12:00 UTC)))
                .collect();
            Ok(SessionBatch::from_sessions(sessions))
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn feed(source: Arc<ScriptedSource>, stale_on_error: bool) -> SessionFeed {
        SessionFeed::new(source, Duration::from_secs(60), 100, stale_on_error)
    }

    #[tokio::test]
    async fn test_success_is_cached() {
        let source = ScriptedSource::new();
        let feed = feed(source.clone(), true);
        let query = SelectionQuery::new(3, SortOrder::Desc);

        let result = feed.fetch("p1", &query).await.unwrap();
        assert!(!result.stale);
        assert_eq!(result.batch.sessions.len(), 3);
        assert!(feed.cached("p1", &query).await.is_some());
        assert!(feed.cached("p2", &query).await.is_none());
        assert_eq!(feed.source_name(), "scripted");
    }

    #[tokio::test]
    async fn test_stale_while_error() {
        let source = ScriptedSource::new();
        let feed = feed(source.clone(), true);
        let query = SelectionQuery::new(2, SortOrder::Desc);

        feed.fetch("p1", &query).await.unwrap();
        source.failing.store(true, Ordering::SeqCst);

        let result = feed.fetch("p1", &query).await.unwrap();
        assert!(result.stale);
        assert_eq!(result.batch.sessions.len(), 2);
        assert!(result.error.unwrap().contains("connection refused"));

        // nothing cached for a different query
        let other = SelectionQuery::new(4, SortOrder::Desc);
        assert!(feed.fetch("p1", &other).await.is_err());
    }

    #[tokio::test]
    async fn test_errors_propagate_when_stale_disabled() {
        let source = ScriptedSource::new();
        let feed = feed(source.clone(), false);
        let query = SelectionQuery::new(2, SortOrder::Desc);

        feed.fetch("p1", &query).await.unwrap();
        source.failing.store(true, Ordering::SeqCst);

        let err = feed.fetch("p1", &query).await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_)));
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let source = ScriptedSource::new();
        let feed = Arc::new(feed(source.clone(), true));
        let slow = SelectionQuery::new(200, SortOrder::Desc);
        let fast = SelectionQuery::new(5, SortOrder::Desc);

        let slow_task = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.fetch("p1", &slow).await })
        };
        // let the slow request take its ticket first
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast_result = feed.fetch("p1", &fast).await.unwrap();
        let slow_result = slow_task.await.unwrap().unwrap();

        // both callers get their own data
        assert_eq!(fast_result.batch.sessions.len(), 5);
        assert_eq!(slow_result.batch.sessions.len(), 200);

        // only the newest request committed
        assert!(feed.cached("p1", &fast).await.is_some());
        assert!(feed.cached("p1", &slow).await.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_generations_are_per_patient() {
        let source = ScriptedSource::new();
        let feed = Arc::new(feed(source, true));
        let slow = SelectionQuery::new(100, SortOrder::Desc);
        let fast = SelectionQuery::new(5, SortOrder::Desc);

        let slow_task = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.fetch("p1", &slow).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        feed.fetch("p2", &fast).await.unwrap();
        slow_task.await.unwrap().unwrap();

        assert!(feed.cached("p1", &slow).await.is_some());
        assert!(feed.cached("p2", &fast).await.is_some());
    }

    #[tokio::test]
    async fn test_settled_patients_are_released() {
        let source = ScriptedSource::new();
        let feed = feed(source.clone(), true);
        let query = SelectionQuery::new(1, SortOrder::Desc);

        for i in 0..500 {
            feed.fetch(&format!("patient-{i}"), &query).await.unwrap();
        }
        assert!(feed.generations.lock().is_empty());

        source.failing.store(true, Ordering::SeqCst);
        for i in 500..600 {
            assert!(feed.fetch(&format!("patient-{i}"), &query).await.is_err());
        }
        assert!(feed.generations.lock().is_empty());
    }

    #[tokio::test]
    async fn test_superseded_request_stays_superseded_after_release() {
        let source = ScriptedSource::new();
        let feed = Arc::new(feed(source, true));
        let slow = SelectionQuery::new(200, SortOrder::Desc);
        let fast = SelectionQuery::new(5, SortOrder::Desc);
        let medium = SelectionQuery::new(60, SortOrder::Desc);

        let slow_task = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.fetch("p1", &slow).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        // newest request settles and releases the patient's entry
        feed.fetch("p1", &fast).await.unwrap();
        let medium_task = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.fetch("p1", &medium).await })
        };
        slow_task.await.unwrap().unwrap();
        medium_task.await.unwrap().unwrap();

        assert!(feed.cached("p1", &slow).await.is_none());
        assert!(feed.cached("p1", &medium).await.is_some());
        assert!(feed.generations.lock().is_empty());
    }

    #[tokio::test]
    async fn test_expired_batch_is_not_served_stale() {
        let source = ScriptedSource::new();
        let feed = SessionFeed::new(source.clone(), Duration::from_millis(50), 100, true);
        let query = SelectionQuery::new(2, SortOrder::Desc);

        feed.fetch("p1", &query).await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        source.failing.store(true, Ordering::SeqCst);

        assert!(feed.fetch("p1", &query).await.is_err());
    }
}
