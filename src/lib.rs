//! Theme-aware publishing for a static blog.
//!
//! Markdown posts are converted to HTML, wrapped in a theme's partials and
//! layout, and written to the published directory as
//! `date-released-<post>.html`.

pub mod config;
pub mod files;
pub mod markdown;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod render;
pub mod theme;
pub mod util;

pub use config::Settings;
pub use publish::{PublishError, Publisher};
