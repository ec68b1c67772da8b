//! Page models and the values exchanged with callers of the publish flow.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::pipeline::ProcessError;

/// Title stamped on freshly built models.
pub const PLACEHOLDER_TITLE: &str = "Title";
/// Author stamped on freshly built models.
pub const PLACEHOLDER_AUTHOR: &str = "author";

/// A page that can be rendered by a theme template.
pub trait PageModel: Serialize {
    fn new(title: String, author: String, date_released: DateTime<Local>, post: String) -> Self
    where
        Self: Sized;

    fn title(&self) -> &str;
    fn author(&self) -> &str;
    fn date_released(&self) -> DateTime<Local>;
    /// The rendered post body
    fn post(&self) -> &str;
}

/// Build a page model around a rendered post.
///
/// The model gets placeholder title and author, and the current local time
/// as its release date.
pub fn build_model<T: PageModel>(post: &str) -> Result<T, ProcessError> {
    if post.trim().is_empty() {
        return Err(ProcessError::invalid("post must not be blank"));
    }

    Ok(T::new(
        PLACEHOLDER_TITLE.to_string(),
        PLACEHOLDER_AUTHOR.to_string(),
        Local::now(),
        post.to_string(),
    ))
}

/// Model for a blog post page.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub title: String,
    pub author: String,
    pub date_released: DateTime<Local>,
    pub post: String,
    pub tags: Vec<String>,
}

impl PageModel for PostPage {
    fn new(title: String, author: String, date_released: DateTime<Local>, post: String) -> Self {
        Self {
            title,
            author,
            date_released,
            post,
            tags: Vec::new(),
        }
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn date_released(&self) -> DateTime<Local> {
        self.date_released
    }

    fn post(&self) -> &str {
        &self.post
    }
}

/// Model for a standalone page (about, contact, ...).
#[derive(Debug, Clone, Serialize)]
pub struct StaticPage {
    pub title: String,
    pub author: String,
    pub date_released: DateTime<Local>,
    pub post: String,
}

impl PageModel for StaticPage {
    fn new(title: String, author: String, date_released: DateTime<Local>, post: String) -> Self {
        Self {
            title,
            author,
            date_released,
            post,
        }
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn author(&self) -> &str {
        &self.author
    }

    fn date_released(&self) -> DateTime<Local> {
        self.date_released
    }

    fn post(&self) -> &str {
        &self.post
    }
}

/// A post submitted for publishing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    pub title: String,
    /// File name for the markdown source (derived from the title when absent)
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Markdown body
    pub body: String,
}

/// Presentation metadata handed to templates as `meta`.
#[derive(Debug, Clone, Serialize)]
pub struct PageMetadata {
    pub theme: String,
    pub head_partial_path: PathBuf,
    pub header_partial_path: PathBuf,
    pub post_partial_path: PathBuf,
    pub footer_partial_path: PathBuf,
    pub date_published: DateTime<Local>,
}

/// Markdown and the HTML converted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPreview {
    pub markdown: String,
    pub html: String,
}

/// Where a publish wrote its artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedPath {
    pub markdown: PathBuf,
    pub html: PathBuf,
}
