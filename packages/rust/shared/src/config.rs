//! Application configuration for disclose.
//!
//! User config lives at `~/.disclose/disclose.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DiscloseError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "disclose.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".disclose";

/// Documents at or below this many lines are left alone.
pub const DEFAULT_CONCISE_MAX_LINES: usize = 100;

/// Documents at or below this many lines that already have a references
/// directory are treated as refactored.
pub const DEFAULT_OPTIMIZED_MAX_LINES: usize = 150;

// ---------------------------------------------------------------------------
// Config structs (matching disclose.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Size thresholds for the eligibility filter.
    #[serde(default)]
    pub eligibility: EligibilityConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Path searched when none is given on the command line.
    #[serde(default = "default_path")]
    pub path: String,

    /// File name of the primary document inside each skill directory.
    #[serde(default = "default_document_name")]
    pub document_name: String,

    /// Name of the sibling directory that receives reference files.
    #[serde(default = "default_references_dir")]
    pub references_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            document_name: default_document_name(),
            references_dir: default_references_dir(),
        }
    }
}

fn default_path() -> String {
    "plugins".into()
}
fn default_document_name() -> String {
    "SKILL.md".into()
}
fn default_references_dir() -> String {
    "references".into()
}

/// `[eligibility]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Documents with at most this many lines are "already concise".
    #[serde(default = "default_concise_max_lines")]
    pub concise_max_lines: usize,

    /// Documents with at most this many lines and an existing references
    /// directory are "already optimized".
    #[serde(default = "default_optimized_max_lines")]
    pub optimized_max_lines: usize,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            concise_max_lines: DEFAULT_CONCISE_MAX_LINES,
            optimized_max_lines: DEFAULT_OPTIMIZED_MAX_LINES,
        }
    }
}

fn default_concise_max_lines() -> usize {
    DEFAULT_CONCISE_MAX_LINES
}
fn default_optimized_max_lines() -> usize {
    DEFAULT_OPTIMIZED_MAX_LINES
}

// ---------------------------------------------------------------------------
// Refactor config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime refactor configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RefactorConfig {
    /// File name of the primary document (e.g. `SKILL.md`).
    pub document_name: String,
    /// Name of the references directory next to the primary document.
    pub references_dir: String,
    /// Eligibility thresholds.
    pub eligibility: EligibilityConfig,
    /// Extract and summarize only; never touch the filesystem.
    pub dry_run: bool,
    /// Skip documents whose headings collide instead of silently overwriting.
    pub strict: bool,
}

impl Default for RefactorConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RefactorConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            document_name: config.defaults.document_name.clone(),
            references_dir: config.defaults.references_dir.clone(),
            eligibility: config.eligibility,
            dry_run: false,
            strict: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.disclose/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DiscloseError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.disclose/disclose.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DiscloseError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        DiscloseError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Reject configs that would make the pipeline write outside a skill directory.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let names = [
        ("document_name", &config.defaults.document_name),
        ("references_dir", &config.defaults.references_dir),
    ];

    for (key, value) in names {
        if value.trim().is_empty() {
            return Err(DiscloseError::config(format!("{key} must not be empty")));
        }
        if value.contains('/') || value.contains('\\') || value == ".." {
            return Err(DiscloseError::config(format!(
                "{key} must be a plain file name, got '{value}'"
            )));
        }
    }

    Ok(())
}
