//! The publish flow offered to front ends.
//!
//! `Publisher` ties the pieces together: resolve the theme, convert the
//! markdown, render the page with the theme's partials and layout, then hand
//! the page to the `PostProcessor` to be written.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::config::Settings;
use crate::files::{FileAccess, LocalFiles};
use crate::markdown::{MarkdownError, MarkdownTransformer, PulldownTransformer};
use crate::model::{
    PLACEHOLDER_AUTHOR, PageMetadata, PostForm, PostPage, PostPreview, PublishedPath,
};
use crate::pipeline::{
    CONTENT, Cancellation, POST_PATH, PUBLISH_PATH, PostProcessor, ProcessContext, ProcessError,
    Processor,
};
use crate::render::{PageContext, RenderError, Renderer};
use crate::theme::{TemplateLocator, TemplateType, ThemeError, ThemePathService};
use crate::util::{slugify, title_case};

#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("markdown error: {0}")]
    Markdown(#[from] MarkdownError),
}

/// Converts, renders and publishes posts.
#[derive(Clone)]
pub struct Publisher {
    settings: Arc<Settings>,
    locator: TemplateLocator,
    paths: ThemePathService,
    processor: PostProcessor,
    files: Arc<dyn FileAccess>,
}

impl Publisher {
    pub fn new(
        settings: Settings,
        markdown: Arc<dyn MarkdownTransformer>,
        files: Arc<dyn FileAccess>,
    ) -> Self {
        Self {
            locator: TemplateLocator::from_settings(&settings, Arc::clone(&files)),
            paths: ThemePathService::from_settings(&settings),
            processor: PostProcessor::new(&settings, markdown, Arc::clone(&files)),
            settings: Arc::new(settings),
            files,
        }
    }

    /// A publisher working on the local filesystem with pulldown-cmark.
    pub fn from_settings(settings: Settings) -> Result<Self, PublishError> {
        let markdown = PulldownTransformer::new(&settings.markdown)?;
        Ok(Self::new(settings, Arc::new(markdown), Arc::new(LocalFiles)))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn locator(&self) -> &TemplateLocator {
        &self.locator
    }

    pub fn paths(&self) -> &ThemePathService {
        &self.paths
    }

    pub fn processor(&self) -> &PostProcessor {
        &self.processor
    }

    /// Convert a submitted post without writing anything.
    pub async fn preview(&self, form: &PostForm) -> Result<PostPreview, PublishError> {
        let html = self.processor.transform_async(form.body.clone()).await?;
        Ok(PostPreview {
            markdown: form.body.clone(),
            html,
        })
    }

    /// Presentation metadata for a theme (blank means the site theme).
    pub fn page_metadata(&self, theme_name: Option<&str>) -> PageMetadata {
        let theme = self.paths.theme_or_site(theme_name);
        PageMetadata {
            theme: theme.to_string(),
            head_partial_path: self.paths.head_path(Some(theme)),
            header_partial_path: self.paths.header_path(Some(theme)),
            post_partial_path: self.paths.post_path(Some(theme)),
            footer_partial_path: self.paths.footer_path(Some(theme)),
            date_published: Local::now(),
        }
    }

    /// Render a full page for `page` with a theme.
    pub async fn render_page(
        &self,
        theme_name: Option<&str>,
        page: &PostPage,
    ) -> Result<String, PublishError> {
        let theme = self
            .locator
            .registry()
            .resolve_theme(Some(self.paths.theme_or_site(theme_name)))?
            .name
            .clone();

        let layout = self
            .locator
            .get_template_async(Some(theme.as_str()), TemplateType::Layout)
            .await?;

        let theme_dir = self.paths.theme_dir(Some(theme.as_str()));
        let mut renderer = tokio::task::spawn_blocking(move || Renderer::for_theme(&theme_dir))
            .await
            .map_err(|e| ProcessError::stage("render", e.to_string()))??;

        let meta = self.page_metadata(Some(theme.as_str()));
        let context = PageContext {
            site: &self.settings.site,
            page,
            meta: &meta,
        };

        Ok(renderer.render_page(&layout, &context)?)
    }

    /// Publish a submitted post.
    ///
    /// Saves the markdown to `<post base>/<slug><extension>`, then publishes
    /// the rendered page. Returns both paths.
    pub async fn publish_post(
        &self,
        form: &PostForm,
        theme_name: Option<&str>,
        cancellation: Option<Cancellation>,
    ) -> Result<PublishedPath, PublishError> {
        let html = self.processor.transform_async(form.body.clone()).await?;
        let mut page: PostPage = self.processor.get_model(&html)?;
        if !form.title.trim().is_empty() {
            page.title = form.title.trim().to_string();
        }
        page.author = self.author_for(form.author.as_deref());
        page.tags = form.tags.clone();

        let slug = form
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&page.title));
        if slug.is_empty() {
            return Err(ProcessError::invalid("post needs a title or a slug").into());
        }

        let content = self.render_page(theme_name, &page).await?;

        if cancellation.as_ref().is_some_and(Cancellation::is_cancelled) {
            return Err(ProcessError::Cancelled.into());
        }

        let post_base = self.processor.post_base();
        let markdown_path = post_base.join(format!("{slug}{}", self.processor.extension()));
        self.files
            .create_dir_all(post_base)
            .await
            .map_err(|e| ProcessError::io(post_base, e))?;
        self.files
            .write(&markdown_path, &form.body)
            .await
            .map_err(|e| ProcessError::io(&markdown_path, e))?;

        let html = self.publish_content(&markdown_path, content, cancellation).await?;

        Ok(PublishedPath {
            markdown: markdown_path,
            html,
        })
    }

    /// Publish an existing markdown source file.
    ///
    /// The page title comes from the file name ("hello-world.md" becomes
    /// "Hello World").
    pub async fn publish_file(
        &self,
        post_path: &Path,
        theme_name: Option<&str>,
        cancellation: Option<Cancellation>,
    ) -> Result<PublishedPath, PublishError> {
        let html = self.processor.get_post_async(post_path).await?;
        let mut page: PostPage = self.processor.get_model(&html)?;
        if let Some(stem) = post_path.file_stem().and_then(|s| s.to_str()) {
            page.title = title_case(stem);
        }
        page.author = self.author_for(None);

        let content = self.render_page(theme_name, &page).await?;
        let html = self.publish_content(post_path, content, cancellation).await?;

        Ok(PublishedPath {
            markdown: post_path.to_path_buf(),
            html,
        })
    }

    async fn publish_content(
        &self,
        post_path: &Path,
        content: String,
        cancellation: Option<Cancellation>,
    ) -> Result<PathBuf, PublishError> {
        let mut ctx = ProcessContext::new()
            .with(POST_PATH, post_path.to_string_lossy().into_owned())
            .with(CONTENT, content);
        if let Some(cancellation) = cancellation {
            ctx = ctx.with_cancellation(cancellation);
        }

        self.processor.process(&mut ctx).await?;
        Ok(PathBuf::from(ctx.require_str(PUBLISH_PATH)?))
    }

    fn author_for(&self, author: Option<&str>) -> String {
        author
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .or(self.settings.site.author.as_deref())
            .unwrap_or(PLACEHOLDER_AUTHOR)
            .to_string()
    }
}
