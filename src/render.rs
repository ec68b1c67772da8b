//! Page composition with Tera.
//!
//! A page is rendered in two passes: each partial (head, header, post,
//! footer) is rendered on its own, then the layout is rendered with the
//! resulting fragments available as `head`, `header`, `post` and `footer`.

use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::model::PageMetadata;
use crate::theme::Partial;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),

    #[error("theme not found: {0}")]
    ThemeNotFound(String),
}

/// Everything templates can see.
#[derive(Debug, Serialize)]
pub struct PageContext<'a, P: Serialize> {
    pub site: &'a SiteConfig,
    pub page: &'a P,
    pub meta: &'a PageMetadata,
}

/// The template renderer for one theme, wrapping Tera.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Create a renderer loading every `.html` template in the theme directory.
    ///
    /// Template names are paths relative to the theme directory, for example
    /// `shared/_head.html`.
    pub fn for_theme(theme_dir: &Path) -> Result<Self, RenderError> {
        if !theme_dir.is_dir() {
            return Err(RenderError::ThemeNotFound(theme_dir.display().to_string()));
        }

        let glob = theme_dir.join("**/*.html");
        let glob_str = glob.to_string_lossy();
        let tera = Tera::new(&glob_str)?;

        Ok(Self { tera })
    }

    /// Wrap an already configured Tera instance.
    pub fn from_tera(tera: Tera) -> Self {
        Self { tera }
    }

    fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a full page: partials first, then `layout` around them.
    ///
    /// Partials the theme does not provide render as empty strings.
    pub fn render_page<P: Serialize>(
        &mut self,
        layout: &str,
        context: &PageContext<'_, P>,
    ) -> Result<String, RenderError> {
        let mut tera_context = Context::new();
        tera_context.insert("site", context.site);
        tera_context.insert("page", context.page);
        tera_context.insert("meta", context.meta);

        let mut fragments = Vec::with_capacity(Partial::FRAGMENTS.len());
        for partial in Partial::FRAGMENTS {
            let name = partial.relative_path();
            let html = if self.has_template(name) {
                self.tera.render(name, &tera_context)?
            } else {
                tracing::warn!(partial = name, "Theme has no such partial, rendering it empty");
                String::new()
            };
            fragments.push((partial.name(), html));
        }
        for (name, html) in fragments {
            tera_context.insert(name, &html);
        }

        // The layout is added as a temporary template so it can extend or
        // import the theme's other templates
        const LAYOUT_TEMPLATE_NAME: &str = "__layout__";
        self.tera.add_raw_template(LAYOUT_TEMPLATE_NAME, layout)?;
        let result = self.tera.render(LAYOUT_TEMPLATE_NAME, &tera_context);
        self.tera.templates.remove(LAYOUT_TEMPLATE_NAME);

        Ok(result?)
    }
}
