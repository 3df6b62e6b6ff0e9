//! HTTP client for the conversation backend.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;
use zeroize::Zeroize;

use super::{BackendError, SessionSource};
use crate::core::session::{SelectionQuery, SessionBatch, SessionPayload};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Longest error body kept in [`BackendError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 512;

const USER_AGENT: &str = concat!("empath-gateway/", env!("CARGO_PKG_VERSION"));

/// Reads sessions from `GET {base_url}/sessions`.
pub struct BackendClient {
    http_client: Client,
    sessions_url: Url,
    token: Option<String>,
    timeout_secs: u64,
}

impl BackendClient {
    /// Builds a client for `base_url`, e.g. `http://localhost:8000/api/v1`.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, BackendError> {
        let sessions_url = sessions_url(base_url)?;
        let timeout_secs = if timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        };

        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(
                DEFAULT_CONNECT_TIMEOUT_SECS.min(timeout_secs),
            ))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BackendError::InvalidConfiguration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            sessions_url,
            token: token.filter(|t| !t.trim().is_empty()),
            timeout_secs,
        })
    }

    pub fn sessions_url(&self) -> &Url {
        &self.sessions_url
    }

    fn classify_send_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(self.timeout_secs)
        } else {
            BackendError::Network(format!("Request failed: {e}"))
        }
    }
}

fn sessions_url(base_url: &str) -> Result<Url, BackendError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{trimmed}/sessions")).map_err(|e| {
        BackendError::InvalidConfiguration(format!("Invalid backend URL '{base_url}': {e}"))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BackendError::InvalidConfiguration(format!(
            "Unsupported backend URL scheme '{other}'"
        ))),
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let mut cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        cut.push('…');
        cut
    }
}

#[async_trait]
impl SessionSource for BackendClient {
    async fn fetch_sessions(
        &self,
        patient_id: &str,
        query: &SelectionQuery,
    ) -> Result<SessionBatch, BackendError> {
        debug!(
            "Fetching sessions for patient {} from {} (limit={}, order={})",
            patient_id,
            self.sessions_url,
            query.limit(),
            query.order
        );

        let mut request = self
            .http_client
            .get(self.sessions_url.clone())
            .header("Accept", "application/json")
            .query(&[("patient_id", patient_id)])
            .query(&query.to_query_pairs());
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        if !status.is_success() {
            let body = truncate_body(&response_text);
            error!("Backend returned {} for patient {}: {}", status, patient_id, body);
            return Err(match status.as_u16() {
                401 | 403 => BackendError::Authentication(format!("{status}: {body}")),
                code => BackendError::Status { status: code, body },
            });
        }

        let payload: SessionPayload = serde_json::from_str(&response_text)
            .map_err(|e| BackendError::Decode(format!("Failed to parse sessions: {e}")))?;
        let batch = SessionBatch::from_payload(payload);
        debug!(
            "Fetched {} sessions ({} rejected) for patient {}",
            batch.sessions.len(),
            batch.rejected,
            patient_id
        );
        Ok(batch)
    }

    fn name(&self) -> &'static str {
        "backend"
    }
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("sessions_url", &self.sessions_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Drop for BackendClient {
    fn drop(&mut self) {
        if let Some(token) = self.token.as_mut() {
            token.zeroize();
        }
    }
}
