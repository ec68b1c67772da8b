//! Conventional partial view paths for themes.
//!
//! Every theme lays its partials out the same way:
//!
//! ```text
//! <themes-root>/<theme>/shared/_head.html
//! <themes-root>/<theme>/shared/_header.html
//! <themes-root>/<theme>/post/post.html
//! <themes-root>/<theme>/shared/_footer.html
//! <themes-root>/<theme>/shared/_layout.html
//! ```

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::util::eq_ignore_case;

/// Root of the views used when a request does not need a theme.
const DEFAULT_VIEWS_ROOT: &str = "views";

/// Controllers whose views are rendered with the site theme.
///
/// `None` means every action of the controller is themed.
const THEMED_VIEWS: &[(&str, Option<&[&str]>)] = &[("Post", Some(&["Preview", "PublishHtml"]))];

/// A reusable template fragment of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partial {
    Head,
    Header,
    Post,
    Footer,
    Layout,
}

impl Partial {
    /// All partials rendered into a page, in page order (layout excluded).
    pub const FRAGMENTS: [Partial; 4] = [Self::Head, Self::Header, Self::Post, Self::Footer];

    /// Path of the partial inside a theme directory.
    pub fn relative_path(self) -> &'static str {
        match self {
            Self::Head => "shared/_head.html",
            Self::Header => "shared/_header.html",
            Self::Post => "post/post.html",
            Self::Footer => "shared/_footer.html",
            Self::Layout => "shared/_layout.html",
        }
    }

    /// Variable name the rendered fragment is exposed as in the layout.
    pub fn name(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Header => "header",
            Self::Post => "post",
            Self::Footer => "footer",
            Self::Layout => "layout",
        }
    }
}

/// Builds partial view paths for a theme.
#[derive(Debug, Clone)]
pub struct ThemePathService {
    themes_root: PathBuf,
    site_theme: String,
}

impl ThemePathService {
    pub fn new(themes_root: impl Into<PathBuf>, site_theme: impl Into<String>) -> Self {
        Self {
            themes_root: themes_root.into(),
            site_theme: site_theme.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.directories.themes.clone(),
            settings.site.theme.clone(),
        )
    }

    pub fn themes_root(&self) -> &Path {
        &self.themes_root
    }

    /// The theme name used when `theme_name` is blank or absent.
    pub fn theme_or_site<'a>(&'a self, theme_name: Option<&'a str>) -> &'a str {
        theme_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(self.site_theme.as_str())
    }

    /// Directory holding a theme's templates.
    pub fn theme_dir(&self, theme_name: Option<&str>) -> PathBuf {
        self.themes_root.join(self.theme_or_site(theme_name))
    }

    pub fn partial_path(&self, partial: Partial, theme_name: Option<&str>) -> PathBuf {
        self.theme_dir(theme_name).join(partial.relative_path())
    }

    pub fn head_path(&self, theme_name: Option<&str>) -> PathBuf {
        self.partial_path(Partial::Head, theme_name)
    }

    pub fn header_path(&self, theme_name: Option<&str>) -> PathBuf {
        self.partial_path(Partial::Header, theme_name)
    }

    pub fn post_path(&self, theme_name: Option<&str>) -> PathBuf {
        self.partial_path(Partial::Post, theme_name)
    }

    pub fn footer_path(&self, theme_name: Option<&str>) -> PathBuf {
        self.partial_path(Partial::Footer, theme_name)
    }

    pub fn layout_path(&self, theme_name: Option<&str>) -> PathBuf {
        self.partial_path(Partial::Layout, theme_name)
    }

    /// Whether a controller action renders with the site theme.
    pub fn is_theme_required(&self, controller: &str, action: Option<&str>) -> bool {
        is_theme_required(controller, action)
    }

    /// Root directory views for a controller action are looked up in.
    pub fn view_root(&self, controller: &str, action: Option<&str>) -> PathBuf {
        if is_theme_required(controller, action) {
            self.theme_dir(None)
        } else {
            PathBuf::from(DEFAULT_VIEWS_ROOT)
        }
    }

    /// Layout used by a controller action.
    ///
    /// Themed layouts are lower-cased, theme directories are expected to use
    /// lower-case names on disk.
    pub fn layout_for(&self, controller: &str, action: Option<&str>) -> PathBuf {
        if is_theme_required(controller, action) {
            let layout = self.layout_path(None);
            PathBuf::from(layout.to_string_lossy().to_lowercase())
        } else {
            Path::new(DEFAULT_VIEWS_ROOT).join(Partial::Layout.relative_path())
        }
    }
}

fn is_theme_required(controller: &str, action: Option<&str>) -> bool {
    if controller.trim().is_empty() {
        return false;
    }

    let Some((_, actions)) = THEMED_VIEWS
        .iter()
        .find(|(name, _)| eq_ignore_case(name, controller))
    else {
        return false;
    };

    match (action.map(str::trim).filter(|a| !a.is_empty()), actions) {
        // No action means all actions on the controller are themed
        (None, _) | (_, None) => true,
        (Some(action), Some(actions)) => actions.iter().any(|a| eq_ignore_case(a, action)),
    }
}
