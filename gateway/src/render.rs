//! Offline rendering for the `render` subcommand.
//!
//! Reads a session dump (the backend's `GET /sessions` payload, either shape)
//! or generates demo sessions, then writes the wheel as SVG or the full page
//! as JSON.

use anyhow::{Context, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::backend::SessionSource;
use crate::config::ServerConfig;
use crate::core::page::build_page;
use crate::core::session::{SessionBatch, SessionPayload};
use crate::core::view_state::PageParams;
use crate::core::wheel::render_svg;
use crate::demo::DemoSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Svg,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "svg" => Some(OutputFormat::Svg),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    /// Session dump; demo sessions are generated when absent.
    pub input: Option<PathBuf>,
    /// Patient id used for demo generation.
    pub patient: String,
    /// Page query string, e.g. `limit=25&emotion=primary:joy`.
    pub query: String,
    pub format: OutputFormat,
    /// Destination file; stdout when absent.
    pub output: Option<PathBuf>,
}

/// Reads a session dump and validates every row.
pub fn load_batch(path: &Path) -> anyhow::Result<SessionBatch> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session dump {}", path.display()))?;
    let payload: SessionPayload = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse session dump {}", path.display()))?;
    Ok(SessionBatch::from_payload(payload))
}

/// Renders `batch` for `query` in the requested format.
pub fn render_batch(
    config: &ServerConfig,
    batch: &SessionBatch,
    query: &str,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let params = PageParams::parse_with_limit(query, config.default_display_limit);
    let page = build_page(
        &batch.sessions,
        &params,
        config.window_policy,
        &config.render_options(),
    );
    match format {
        OutputFormat::Svg => Ok(render_svg(&page.scene)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&page).map_err(|e| anyhow!("Failed to encode page: {e}"))
        }
    }
}

pub async fn run(config: &ServerConfig, args: RenderArgs) -> anyhow::Result<()> {
    let batch = match &args.input {
        Some(path) => load_batch(path)?,
        None => {
            info!("No input given, rendering demo sessions for {}", args.patient);
            let params = PageParams::parse_with_limit(&args.query, config.default_display_limit);
            DemoSource::new()
                .fetch_sessions(&args.patient, &params.fetch_query(config.fetch_limit))
                .await?
        }
    };
    if batch.rejected > 0 {
        warn!("{} session rows rejected", batch.rejected);
    }

    let rendered = render_batch(config, &batch, &args.query, args.format)?;
    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
