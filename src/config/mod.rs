//! Configuration loading and types for scissorhands.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for config structures (`types`)
//! - Loading configs from files and the environment (`load`)
//! - Startup validation, so request-time lookups never meet a broken config

mod load;
mod types;

use std::collections::HashSet;
use std::path::PathBuf;

pub use load::{CONFIG_FILE, absolute_config_path, base_path_from_config};
pub use types::{
    ContentConfig, DEFAULT_THEME, DirectoryConfig, MarkdownConfig, Settings, SiteConfig,
};

// =============================================================================
// Errors
// =============================================================================

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to deserialize config: {0}")]
    Deserialize(#[from] config::ConfigError),

    #[error("failed to get current working directory: {0}")]
    CwdFailure(std::io::Error),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config: no theme named '{DEFAULT_THEME}' is configured")]
    MissingDefaultTheme,

    #[error("invalid config: theme '{0}' is configured more than once")]
    DuplicateTheme(String),

    #[error("{0}")]
    Validation(String),
}

// =============================================================================
// Validation
// =============================================================================

impl Settings {
    /// Check the invariants the rest of the crate relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for theme in &self.themes {
            if theme.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "invalid config: every theme needs a non-blank 'name'".to_string(),
                ));
            }
            if !seen.insert(theme.name.to_lowercase()) {
                return Err(ConfigError::DuplicateTheme(theme.name.clone()));
            }
        }
        if !seen.contains(DEFAULT_THEME) {
            return Err(ConfigError::MissingDefaultTheme);
        }

        let extension = self.contents.extension.as_str();
        if extension.trim() != extension || !extension.starts_with('.') || extension == "." {
            return Err(ConfigError::Validation(format!(
                "invalid config: 'contents.extension' must look like '.md', got '{}'",
                self.contents.extension
            )));
        }

        crate::markdown::parse_extensions(&self.markdown.extensions)
            .map_err(|e| ConfigError::Validation(format!("invalid config: {e}")))?;

        Ok(())
    }
}
