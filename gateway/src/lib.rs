pub mod backend;
pub mod config;
pub mod core;
pub mod demo;
pub mod errors;
pub mod feed;
pub mod handlers;
pub mod render;
pub mod routes;
pub mod state;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use core::*;
pub use errors::app_error::{AppError, AppResult};
pub use state::AppState;
