//! Shared types, error model, and configuration for sitenav.
//!
//! This crate is the foundation depended on by all other sitenav crates.
//! It provides:
//! - [`SitenavError`] and [`Degraded`] — the unified error type and the
//!   fail-soft wrapper used at navigation boundaries
//! - Domain types ([`ContentItem`], [`SiblingPage`], [`SiblingPages`], [`ContentUrl`])
//! - Configuration ([`AppConfig`], [`SiblingConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GraphConfig, NavigationConfig, SectionEntry, SiblingConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, resolve_single_key,
};
pub use error::{Degraded, FailSoft, OrFallback, Result, SitenavError};
pub use types::{ContentItem, ContentUrl, SiblingPage, SiblingPages, UNTITLED};
