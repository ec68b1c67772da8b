//! Themes: named bundles of template filenames.
//!
//! - `Theme` and `TemplateType` describe what a theme provides
//! - `ThemeRegistry` resolves a requested name to a configured theme
//! - `locator` turns a theme and template kind into a file and its contents
//! - `paths` builds the conventional partial view paths for a theme

mod locator;
mod paths;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_THEME, Settings};
use crate::util::eq_ignore_case;

pub use locator::TemplateLocator;
pub use paths::{Partial, ThemePathService};

#[derive(thiserror::Error, Debug)]
pub enum ThemeError {
    #[error("theme '{0}' not found and no '{DEFAULT_THEME}' theme is configured")]
    NotFound(String),

    #[error("invalid template type: {0}")]
    InvalidTemplateType(String),

    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A named visual theme and the template file used for each template kind.
///
/// Filenames are relative to `<themes dir>/<name>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Layout template
    pub master: String,
    pub page: String,
    pub post: String,
    pub tag: String,
}

impl Theme {
    /// A theme using the conventional file layout written by `scissorhands init`.
    pub fn conventional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            master: "shared/_layout.html".to_string(),
            page: "page.html".to_string(),
            post: "post/post.html".to_string(),
            tag: "tag.html".to_string(),
        }
    }

    /// The template filename used for `kind`.
    pub fn template_name(&self, kind: TemplateType) -> &str {
        match kind {
            TemplateType::Layout => &self.master,
            TemplateType::Page => &self.page,
            TemplateType::Post => &self.post,
            TemplateType::Tag => &self.tag,
        }
    }
}

/// Which template of a theme to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Layout,
    Page,
    Post,
    Tag,
}

impl FromStr for TemplateType {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "layout" | "master" => Ok(Self::Layout),
            "page" => Ok(Self::Page),
            "post" => Ok(Self::Post),
            "tag" => Ok(Self::Tag),
            _ => Err(ThemeError::InvalidTemplateType(s.to_string())),
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layout => "layout",
            Self::Page => "page",
            Self::Post => "post",
            Self::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// Immutable lookup over the configured themes.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl ThemeRegistry {
    pub fn new(themes: Vec<Theme>) -> Self {
        Self { themes }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.themes.clone())
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Resolve a theme by name.
    ///
    /// Blank or absent names mean `default`. Names match case-insensitively,
    /// and unknown names fall back to the `default` theme.
    pub fn resolve_theme(&self, name: Option<&str>) -> Result<&Theme, ThemeError> {
        let requested = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_THEME);

        let theme = self
            .find(requested)
            .or_else(|| self.find(DEFAULT_THEME))
            .ok_or_else(|| ThemeError::NotFound(requested.to_string()))?;

        tracing::debug!(requested, resolved = %theme.name, "Resolved theme");
        Ok(theme)
    }

    fn find(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| eq_ignore_case(&t.name, name))
    }
}
