//! Shared types, error model, and configuration for disclose.
//!
//! This crate is the foundation depended on by all other disclose crates.
//! It provides:
//! - [`DiscloseError`], the unified error type
//! - Outcome types ([`DocumentOutcome`], [`SkipReason`], [`RunReport`])
//! - Configuration ([`AppConfig`], [`RefactorConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_CONCISE_MAX_LINES, DEFAULT_OPTIMIZED_MAX_LINES, DefaultsConfig,
    EligibilityConfig, RefactorConfig, config_dir, config_file_path, load_config,
    load_config_from, validate_config,
};
pub use error::{DiscloseError, Result};
pub use types::{DocumentOutcome, DocumentReport, RunReport, RunStats, SkipReason, WrittenFile};
