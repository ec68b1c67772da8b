//! Markdown to HTML conversion.
//!
//! The pipeline only depends on `MarkdownTransformer`; `PulldownTransformer`
//! is the pulldown-cmark implementation used everywhere outside of tests.

use std::collections::HashSet;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use pulldown_cmark_escape::escape_html;

use crate::config::MarkdownConfig;
use crate::util::slugify;

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Converts markdown text to an HTML fragment.
///
/// Implementations are pure: the same input always gives the same output,
/// and malformed markdown is rendered as well as possible instead of rejected.
pub trait MarkdownTransformer: Send + Sync {
    fn transform(&self, markdown: &str) -> String;
}

/// Parse configured extension names into pulldown-cmark options.
pub fn parse_extensions(extensions: &[String]) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in extensions {
        match extension.as_str() {
            "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
            "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
            "gfm" => options.insert(Options::ENABLE_GFM),
            "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
            "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
            "tables" => options.insert(Options::ENABLE_TABLES),
            "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
            other => return Err(MarkdownError::InvalidExtension(other.to_string())),
        }
    }
    Ok(options)
}

/// `MarkdownTransformer` backed by pulldown-cmark.
///
/// Headings without an explicit id get a unique slug id and a permalink anchor.
#[derive(Debug, Clone)]
pub struct PulldownTransformer {
    options: Options,
}

impl PulldownTransformer {
    pub fn new(config: &MarkdownConfig) -> Result<Self, MarkdownError> {
        Ok(Self {
            options: parse_extensions(&config.extensions)?,
        })
    }
}

impl Default for PulldownTransformer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TABLES
                | Options::ENABLE_TASKLISTS,
        }
    }
}

impl MarkdownTransformer for PulldownTransformer {
    fn transform(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut heading: Option<HeadingState> = None;
        let mut used_heading_ids: HashSet<String> = HashSet::new();

        for event in parser {
            // Buffer everything inside a heading so the id can be built from its text
            if heading.is_some() {
                if let Event::End(TagEnd::Heading(_)) = event {
                    if let Some(state) = heading.take() {
                        events.push(Event::Html(state.render(&mut used_heading_ids).into()));
                    }
                } else if let Some(state) = heading.as_mut() {
                    state.push(event);
                }
                continue;
            }

            match event {
                Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes,
                    attrs,
                }) => {
                    heading = Some(HeadingState {
                        level,
                        classes,
                        attrs,
                        inner: Vec::new(),
                        text: String::new(),
                    });
                }
                Event::Start(Tag::Heading { id: Some(ref id), .. }) => {
                    used_heading_ids.insert(id.to_string());
                    events.push(event);
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

struct HeadingState<'a> {
    level: HeadingLevel,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    inner: Vec<Event<'a>>,
    text: String,
}

impl<'a> HeadingState<'a> {
    fn push(&mut self, event: Event<'a>) {
        if let Event::Text(text) | Event::Code(text) = &event {
            self.text.push_str(text);
        }
        self.inner.push(event);
    }

    fn render(self, used_ids: &mut HashSet<String>) -> String {
        let base_id = match slugify(&self.text) {
            slug if slug.is_empty() => "section".to_string(),
            slug => slug,
        };
        let mut id = base_id.clone();
        let mut suffix = 1;
        while used_ids.contains(&id) {
            id = format!("{}-{}", base_id, suffix);
            suffix += 1;
        }
        used_ids.insert(id.clone());

        let class_attr = if self.classes.is_empty() {
            String::new()
        } else {
            let classes: Vec<String> = self.classes.iter().map(|c| escape_attr(c)).collect();
            format!(" class=\"{}\"", classes.join(" "))
        };

        let extra_attrs = self
            .attrs
            .iter()
            .map(|(k, v)| match v {
                Some(val) => format!(" {}=\"{}\"", escape_attr(k), escape_attr(val)),
                None => format!(" {}", escape_attr(k)),
            })
            .collect::<String>();

        let mut inner_html = String::new();
        html::push_html(&mut inner_html, self.inner.into_iter());

        let level = self.level as usize;
        format!(
            "<h{level} id=\"{id}\"{class_attr}{extra_attrs}>{inner_html} \
             <a class=\"header-anchor\" href=\"#{id}\" aria-label=\"Link to this heading\">#</a></h{level}>\n"
        )
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    // Writing to a String cannot fail
    let _ = escape_html(&mut escaped, value);
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let html = PulldownTransformer::default().transform("# Hello\n\nWorld");

        assert!(html.contains("<h1 id=\"hello\">Hello"));
        assert!(html.contains("<p>World</p>"));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let transformer = PulldownTransformer::default();
        let text = "## Intro\n\nSome *text*.\n\n## Intro\n";
        assert_eq!(transformer.transform(text), transformer.transform(text));
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let html = PulldownTransformer::default().transform("## Intro\n\n## Intro\n");

        assert!(html.contains("id=\"intro\""));
        assert!(html.contains("id=\"intro-1\""));
    }

    #[test]
    fn test_heading_keeps_inline_markup() {
        let html = PulldownTransformer::default().transform("## Using `cargo` *well*\n");

        assert!(html.contains("id=\"using-cargo-well\""));
        assert!(html.contains("<code>cargo</code>"));
        assert!(html.contains("<em>well</em>"));
    }

    #[test]
    fn test_malformed_markdown_passes_through() {
        let html = PulldownTransformer::default().transform("**unclosed [link](\n<div>");
        assert!(html.contains("unclosed"));
    }

    #[test]
    fn test_tables_enabled_by_default() {
        let html = PulldownTransformer::default().transform("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_heading_attributes_are_escaped() {
        let config = MarkdownConfig {
            extensions: vec!["heading_attributes".to_string()],
        };
        let transformer = PulldownTransformer::new(&config).unwrap();

        let html = transformer.transform("# Title {.a\"onmouseover=x data-x=\"<b>\"}\n");

        assert!(html.contains("class=\"a&quot;onmouseover=x\""));
        assert!(html.contains("data-x=\"&quot;&lt;b&gt;&quot;\""));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_invalid_extension() {
        let config = MarkdownConfig {
            extensions: vec!["not_a_real_extension".to_string()],
        };

        let result = PulldownTransformer::new(&config);
        assert!(matches!(result, Err(MarkdownError::InvalidExtension(_))));
    }

    #[test]
    fn test_configured_extensions() {
        let config = MarkdownConfig {
            extensions: vec!["strikethrough".to_string()],
        };
        let transformer = PulldownTransformer::new(&config).unwrap();

        assert!(transformer.transform("~~gone~~").contains("<del>gone</del>"));
        assert!(!transformer
            .transform("| a | b |\n|---|---|\n| 1 | 2 |\n")
            .contains("<table>"));
    }
}
