//! Configuration type definitions.
//!
//! This module contains the data structures used in `scissorhands.yaml`.
//! These types are pure data - no I/O or complex logic.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// The name of the theme every lookup falls back to.
pub const DEFAULT_THEME: &str = "default";

// =============================================================================
// Root settings
// =============================================================================

/// Process-wide settings, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub directories: DirectoryConfig,
    #[serde(default)]
    pub contents: ContentConfig,
    #[serde(default = "default_themes")]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            directories: DirectoryConfig::default(),
            contents: ContentConfig::default(),
            themes: default_themes(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl Settings {
    /// Resolve every relative directory against `base_path`.
    pub fn resolve_paths(mut self, base_path: &Path) -> Self {
        let resolve = |path: &PathBuf| {
            if path.is_relative() {
                base_path.join(path)
            } else {
                path.clone()
            }
        };

        self.directories.posts = resolve(&self.directories.posts);
        self.directories.post_base = self.directories.post_base.as_ref().map(resolve);
        self.directories.themes = resolve(&self.directories.themes);
        self.directories.published = resolve(&self.directories.published);
        self
    }

    /// Directory that single post names are resolved against.
    ///
    /// Falls back to the posts directory when no separate base is configured.
    pub fn post_base(&self) -> &Path {
        self.directories
            .post_base
            .as_deref()
            .unwrap_or(&self.directories.posts)
    }
}

fn default_themes() -> Vec<Theme> {
    vec![Theme::conventional(DEFAULT_THEME)]
}

// =============================================================================
// Site configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    /// Theme used for partial views when the caller does not pick one
    #[serde(default = "default_site_theme")]
    pub theme: String,
    pub author: Option<String>,
    pub url: Option<String>,
}

fn default_site_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            theme: default_site_theme(),
            author: None,
            url: None,
        }
    }
}

// =============================================================================
// Directories
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory listed when looking for post sources
    #[serde(default = "default_posts")]
    pub posts: PathBuf,
    /// Directory single post names are resolved against (defaults to `posts`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_base: Option<PathBuf>,
    /// Root directory holding one sub-directory per theme
    #[serde(default = "default_themes_dir")]
    pub themes: PathBuf,
    /// Directory published HTML is written to
    #[serde(default = "default_published")]
    pub published: PathBuf,
}

fn default_posts() -> PathBuf {
    PathBuf::from("posts")
}

fn default_themes_dir() -> PathBuf {
    PathBuf::from("themes")
}

fn default_published() -> PathBuf {
    PathBuf::from("_published")
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            posts: default_posts(),
            post_base: None,
            themes: default_themes_dir(),
            published: default_published(),
        }
    }
}

// =============================================================================
// Contents
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// File extension of post sources, including the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    ".md".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
        }
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

fn default_markdown_extensions() -> Vec<String> {
    vec![
        "footnotes".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}
