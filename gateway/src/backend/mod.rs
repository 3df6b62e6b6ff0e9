//! Session sources.
//!
//! ```text
//! SessionFeed ──► dyn SessionSource ──┬── BackendClient  (GET {backend}/sessions)
//!                                     └── DemoSource     (synthetic, placeholder)
//! ```
//!
//! Every source hands back validated [`SessionBatch`]es. Raw rows are
//! validated here, at the fetch boundary, so nothing downstream sees an
//! unparseable timestamp.

pub mod client;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::session::{SelectionQuery, SessionBatch};

pub use client::BackendClient;

/// Errors returned when fetching sessions.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend authentication failed: {0}")]
    Authentication(String),

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Invalid backend configuration: {0}")]
    InvalidConfiguration(String),
}

impl BackendError {
    /// HTTP status reported by the backend, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Something that can list a patient's conversation sessions.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn fetch_sessions(
        &self,
        patient_id: &str,
        query: &SelectionQuery,
    ) -> Result<SessionBatch, BackendError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
