//! Configuration module for the SEO Spider tools
//!
//! This module provides the `SpiderConfig` struct and its builder for locating
//! the Screaming Frog CLI, its crawl database and the scratch export root,
//! with validation and per-OS defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::SpiderConfigBuilder;
pub use types::SpiderConfig;
