//! Ongil Services: the parts of the app that touch the outside world.
//!
//! - TOML configuration with environment overrides
//! - Blocking client for the remote analysis API
//! - File-backed community board (posts, comments, tags, search history)
//! - Sample content for a fresh board

pub mod api;
pub mod community;
pub mod config;
pub mod seed;

pub use api::{AnalysisService, ApiClient, ApiError};
pub use community::{CommunityStore, StoreError};
pub use config::{AppConfig, ConfigError};
