//! HTTP request handlers
//!
//! This module organizes all API handlers into logical groups:
//! - `api` - Health check endpoint
//! - `emotions` - Per-patient wheel page, SVG and summary
//! - `taxonomy` - Static taxonomy and legend

pub mod api;
pub mod emotions;
pub mod taxonomy;
