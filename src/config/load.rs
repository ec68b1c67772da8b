//! Configuration loading from files.
//!
//! Settings come from the YAML config file, then `SCISSORHANDS__*`
//! environment variables layered on top (`SCISSORHANDS__SITE__THEME=dark`).

use std::path::{Path, PathBuf};

use super::{ConfigError, Settings};

/// Default config file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "scissorhands.yaml";

const ENV_PREFIX: &str = "SCISSORHANDS";

impl Settings {
    /// Load the settings from the command line argument, defaulting to `scissorhands.yaml`
    pub fn load_from_arg(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config_file = absolute_config_path(config_file)?;
        Self::load_from_file(&config_file)
    }

    /// Load, resolve and validate the settings from a file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let settings: Settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        let settings = settings.resolve_paths(&base_path_from_config(path));
        settings.validate()?;

        tracing::debug!(
            config = %path.display(),
            themes = settings.themes.len(),
            "Loaded settings"
        );

        Ok(settings)
    }
}

/// Make a config file argument absolute against the current directory.
pub fn absolute_config_path(config_file: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let config_file = config_file.unwrap_or(Path::new(CONFIG_FILE));
    if config_file.is_relative() {
        Ok(std::env::current_dir()
            .map_err(ConfigError::CwdFailure)?
            .join(config_file))
    } else {
        Ok(config_file.to_path_buf())
    }
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_from_config() {
        assert_eq!(
            base_path_from_config(Path::new("/project/scissorhands.yaml")),
            PathBuf::from("/project")
        );
        assert_eq!(
            base_path_from_config(Path::new("scissorhands.yaml")),
            PathBuf::from("")
        );
    }

    #[test]
    fn test_load_resolves_relative_directories() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &config_path,
            r#"
site:
  title: Test Blog
  theme: dark
directories:
  posts: content/posts
  published: /srv/out
themes:
  - name: default
    master: _layout.html
    page: page.html
    post: post.html
    tag: tag.html
  - name: dark
    master: master.html
    page: page.html
    post: single.html
    tag: tag.html
"#,
        )
        .unwrap();

        let settings = Settings::load_from_file(&config_path).unwrap();

        assert_eq!(settings.site.theme, "dark");
        assert_eq!(settings.themes.len(), 2);
        assert_eq!(
            settings.directories.posts,
            temp_dir.path().join("content/posts")
        );
        assert_eq!(settings.directories.published, PathBuf::from("/srv/out"));
        assert_eq!(settings.directories.themes, temp_dir.path().join("themes"));
        assert_eq!(settings.post_base(), temp_dir.path().join("content/posts"));
        assert_eq!(settings.contents.extension, ".md");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Settings::load_from_file(&temp_dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_config_without_default_theme() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &config_path,
            r#"
themes:
  - name: dark
    master: master.html
    page: page.html
    post: post.html
    tag: tag.html
"#,
        )
        .unwrap();

        let result = Settings::load_from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::MissingDefaultTheme)));
    }
}
