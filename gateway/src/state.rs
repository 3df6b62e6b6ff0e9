use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::backend::{BackendClient, BackendError, SessionSource};
use crate::config::ServerConfig;
use crate::core::wheel::RenderOptions;
use crate::demo::DemoSource;
use crate::feed::SessionFeed;

/// Shared application state handed to every handler.
pub struct AppState {
    pub config: ServerConfig,
    pub feed: SessionFeed,
    pub render_options: RenderOptions,
}

impl AppState {
    /// Builds state with the source selected by `config.demo_mode`.
    pub async fn new(config: ServerConfig) -> Result<Arc<Self>, BackendError> {
        let source: Arc<dyn SessionSource> = if config.demo_mode {
            info!("Demo mode enabled: serving placeholder sessions");
            Arc::new(DemoSource::new())
        } else {
            info!("Using conversation backend at {}", config.backend_url);
            Arc::new(BackendClient::new(
                &config.backend_url,
                config.backend_token.clone(),
                config.backend_timeout_seconds,
            )?)
        };
        Ok(Self::with_source(config, source))
    }

    /// Builds state around an explicit session source.
    pub fn with_source(config: ServerConfig, source: Arc<dyn SessionSource>) -> Arc<Self> {
        let feed = SessionFeed::new(
            source,
            Duration::from_secs(config.cache_ttl_seconds),
            config.cache_capacity,
            config.stale_on_error,
        );
        let render_options = config.render_options();
        Arc::new(Self {
            config,
            feed,
            render_options,
        })
    }
}
