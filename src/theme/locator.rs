//! Template lookup: theme + template kind -> file on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::files::FileAccess;
use crate::util::block_on;

use super::{TemplateType, ThemeError, ThemeRegistry};

/// Resolves and loads theme templates.
///
/// Paths are `<themes dir>/<theme name>/<template filename>`, joined as-is.
#[derive(Clone)]
pub struct TemplateLocator {
    registry: ThemeRegistry,
    themes_dir: PathBuf,
    files: Arc<dyn FileAccess>,
}

impl TemplateLocator {
    pub fn new(registry: ThemeRegistry, themes_dir: PathBuf, files: Arc<dyn FileAccess>) -> Self {
        Self {
            registry,
            themes_dir,
            files,
        }
    }

    pub fn from_settings(settings: &Settings, files: Arc<dyn FileAccess>) -> Self {
        Self::new(
            ThemeRegistry::from_settings(settings),
            settings.directories.themes.clone(),
            files,
        )
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    /// Compute the path of a theme's template without reading it.
    pub fn template_path(
        &self,
        theme_name: Option<&str>,
        kind: TemplateType,
    ) -> Result<PathBuf, ThemeError> {
        let theme = self.registry.resolve_theme(theme_name)?;
        Ok(self
            .themes_dir
            .join(&theme.name)
            .join(theme.template_name(kind)))
    }

    /// Load a theme's template.
    pub async fn get_template_async(
        &self,
        theme_name: Option<&str>,
        kind: TemplateType,
    ) -> Result<String, ThemeError> {
        let path = self.template_path(theme_name, kind)?;
        tracing::debug!(%kind, path = %path.display(), "Loading template");

        self.files
            .read(&path)
            .await
            .map_err(|source| ThemeError::Io { path, source })
    }

    /// Blocking form of [`get_template_async`](Self::get_template_async).
    pub fn get_template(
        &self,
        theme_name: Option<&str>,
        kind: TemplateType,
    ) -> Result<String, ThemeError> {
        block_on(self.get_template_async(theme_name, kind)).map_err(|source| ThemeError::Io {
            path: self.themes_dir.clone(),
            source,
        })?
    }
}
