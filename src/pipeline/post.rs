//! Post discovery, conversion and publishing.

use std::fs::ReadDir;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;
use crate::files::FileAccess;
use crate::markdown::MarkdownTransformer;
use crate::model::{PageModel, build_model};
use crate::util::{block_on, ends_with_ignore_case, strip_suffix_ignore_case};

use super::{Cancellation, PUBLISH_PATH, ProcessContext, ProcessError, Processor, PublishRequest};

/// Prefix of every published file name.
pub const PUBLISH_PREFIX: &str = "date-released-";

/// Loads posts, converts them to HTML and publishes the result.
///
/// Publishing writes `<published dir>/date-released-<post name>.html`,
/// where the post name is the post's file name with the content extension
/// replaced. Publishing the same post twice overwrites the first result.
/// Concurrent publishes of the same post are not coordinated: whichever
/// write lands last wins.
#[derive(Clone)]
pub struct PostProcessor {
    posts_dir: PathBuf,
    post_base: PathBuf,
    published_dir: PathBuf,
    extension: String,
    markdown: Arc<dyn MarkdownTransformer>,
    files: Arc<dyn FileAccess>,
}

impl PostProcessor {
    pub fn new(
        settings: &Settings,
        markdown: Arc<dyn MarkdownTransformer>,
        files: Arc<dyn FileAccess>,
    ) -> Self {
        Self {
            posts_dir: settings.directories.posts.clone(),
            post_base: settings.post_base().to_path_buf(),
            published_dir: settings.directories.published.clone(),
            extension: settings.contents.extension.clone(),
            markdown,
            files,
        }
    }

    pub fn published_dir(&self) -> &Path {
        &self.published_dir
    }

    pub fn post_base(&self) -> &Path {
        &self.post_base
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Convert markdown to HTML on the blocking thread pool.
    pub async fn transform_async(&self, markdown: String) -> Result<String, ProcessError> {
        let transformer = Arc::clone(&self.markdown);
        tokio::task::spawn_blocking(move || transformer.transform(&markdown))
            .await
            .map_err(|e| ProcessError::stage(self.name(), e.to_string()))
    }

    /// Load a markdown post and convert it to HTML.
    pub async fn get_post_async(&self, post_path: impl AsRef<Path>) -> Result<String, ProcessError> {
        let post_path = post_path.as_ref();
        if is_blank(post_path) {
            return Err(ProcessError::invalid("post path must not be blank"));
        }

        let doc = self
            .files
            .read(post_path)
            .await
            .map_err(|e| ProcessError::io(post_path, e))?;

        tracing::debug!(path = %post_path.display(), bytes = doc.len(), "Loaded post");
        self.transform_async(doc).await
    }

    /// Blocking form of [`get_post_async`](Self::get_post_async).
    pub fn get_post(&self, post_path: impl AsRef<Path>) -> Result<String, ProcessError> {
        let post_path = post_path.as_ref();
        block_on(self.get_post_async(post_path)).map_err(|e| ProcessError::io(post_path, e))?
    }

    /// List post sources.
    ///
    /// Without a post name, yields every file in the posts directory whose
    /// name ends with the content extension (ignoring case). With a post
    /// name, yields `<post base>/<name>` if it has the content extension,
    /// and nothing otherwise.
    ///
    /// The directory is read lazily; call again to see later changes.
    pub fn get_post_paths(&self, post_path: Option<&str>) -> Result<PostPaths, ProcessError> {
        match post_path.map(str::trim).filter(|p| !p.is_empty()) {
            None => {
                let entries = std::fs::read_dir(&self.posts_dir)
                    .map_err(|e| ProcessError::io(&self.posts_dir, e))?;
                Ok(PostPaths::Listing {
                    entries,
                    extension: self.extension.clone(),
                })
            }
            Some(name) => {
                let path = self.post_base.join(name);
                let single = is_post(&path, &self.extension).then_some(path);
                Ok(PostPaths::Single(single))
            }
        }
    }

    /// Build a page model around a rendered post.
    pub fn get_model<T: PageModel>(&self, post: &str) -> Result<T, ProcessError> {
        build_model(post)
    }

    /// Name of the file a post is published as.
    pub fn publish_file_name(&self, post_path: &Path) -> Result<String, ProcessError> {
        let name = post_path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                ProcessError::invalid(format!(
                    "post path '{}' has no file name",
                    post_path.display()
                ))
            })?;

        let stem = strip_suffix_ignore_case(name, &self.extension).unwrap_or(name);
        Ok(format!("{PUBLISH_PREFIX}{stem}.html"))
    }

    /// Full path a post is published to.
    pub fn publish_path(&self, post_path: &Path) -> Result<PathBuf, ProcessError> {
        Ok(self.published_dir.join(self.publish_file_name(post_path)?))
    }

    /// Write a post's content to the published directory.
    ///
    /// Creates the published directory if needed, then replaces the output
    /// file. A cancelled `cancellation` aborts before the write is issued.
    pub async fn publish(
        &self,
        request: &PublishRequest,
        cancellation: Option<&Cancellation>,
    ) -> Result<PathBuf, ProcessError> {
        let publish_path = self.publish_path(&request.post_path)?;

        if cancellation.is_some_and(Cancellation::is_cancelled) {
            return Err(ProcessError::Cancelled);
        }

        self.files
            .create_dir_all(&self.published_dir)
            .await
            .map_err(|e| ProcessError::io(&self.published_dir, e))?;

        if cancellation.is_some_and(Cancellation::is_cancelled) {
            return Err(ProcessError::Cancelled);
        }

        self.files
            .write(&publish_path, &request.content)
            .await
            .map_err(|e| ProcessError::io(&publish_path, e))?;

        tracing::info!(
            post = %request.post_path.display(),
            output = %publish_path.display(),
            "Published post"
        );

        Ok(publish_path)
    }
}

#[async_trait]
impl Processor for PostProcessor {
    fn name(&self) -> &'static str {
        "post"
    }

    async fn process(&self, ctx: &mut ProcessContext) -> Result<bool, ProcessError> {
        let request = PublishRequest::try_from(&*ctx)?;
        if ctx.is_cancelled() {
            return Err(ProcessError::Cancelled);
        }

        let publish_path = self.publish(&request, ctx.cancellation()).await?;

        ctx.insert(PUBLISH_PATH, publish_path.to_string_lossy().into_owned());
        Ok(true)
    }
}

/// Post source paths, read lazily.
#[derive(Debug)]
pub enum PostPaths {
    Listing { entries: ReadDir, extension: String },
    Single(Option<PathBuf>),
}

impl Iterator for PostPaths {
    type Item = io::Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            PostPaths::Single(path) => path.take().map(Ok),
            PostPaths::Listing { entries, extension } => loop {
                let path = match entries.next()? {
                    Ok(entry) => entry.path(),
                    Err(e) => return Some(Err(e)),
                };
                if path.is_file() && is_post(&path, extension) {
                    return Some(Ok(path));
                }
            },
        }
    }
}

fn is_post(path: &Path, extension: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| ends_with_ignore_case(name, extension))
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::LocalFiles;
    use crate::files::testing::MemoryFiles;
    use crate::markdown::PulldownTransformer;
    use crate::model::PostPage;
    use crate::pipeline::{CONTENT, POST_PATH};

    fn settings(root: &Path) -> Settings {
        let mut settings = Settings::default();
        settings.directories.posts = root.join("posts");
        settings.directories.published = root.join("out");
        settings
    }

    fn processor(root: &Path) -> PostProcessor {
        PostProcessor::new(
            &settings(root),
            Arc::new(PulldownTransformer::default()),
            Arc::new(LocalFiles),
        )
    }

    fn memory_processor(files: Arc<MemoryFiles>) -> PostProcessor {
        PostProcessor::new(
            &settings(Path::new("/blog")),
            Arc::new(PulldownTransformer::default()),
            files,
        )
    }

    fn sorted_names(paths: PostPaths) -> Vec<String> {
        let mut names: Vec<String> = paths
            .map(|p| p.unwrap().file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_get_post_async_converts_markdown() {
        let files = Arc::new(MemoryFiles::default().with_file("/blog/posts/a.md", "# Hi\n\nThere"));
        let processor = memory_processor(files.clone());

        let html = processor.get_post_async("/blog/posts/a.md").await.unwrap();

        assert!(html.contains("<h1 id=\"hi\">Hi"));
        assert!(html.contains("<p>There</p>"));
        assert_eq!(files.ops(), vec!["read /blog/posts/a.md"]);
    }

    #[tokio::test]
    async fn test_get_post_async_blank_path_never_touches_files() {
        let files = Arc::new(MemoryFiles::default());
        let processor = memory_processor(files.clone());

        for path in ["", "  ", "\t"] {
            let err = processor.get_post_async(path).await.unwrap_err();
            assert!(matches!(err, ProcessError::InvalidArgument(_)));
        }
        assert!(files.ops().is_empty());
    }

    #[tokio::test]
    async fn test_get_post_async_missing_file() {
        let processor = memory_processor(Arc::new(MemoryFiles::default()));

        let err = processor.get_post_async("/blog/posts/nope.md").await.unwrap_err();
        match err {
            ProcessError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/blog/posts/nope.md"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected IO error, got {other:?}"),
        }
    }

    #[test]
    fn test_get_post_blocking() {
        let temp_dir = tempfile::tempdir().unwrap();
        let posts = temp_dir.path().join("posts");
        std::fs::create_dir_all(&posts).unwrap();
        std::fs::write(posts.join("a.md"), "*hello*").unwrap();

        let html = processor(temp_dir.path()).get_post(posts.join("a.md")).unwrap();
        assert_eq!(html.trim(), "<p><em>hello</em></p>");

        let err = processor(temp_dir.path()).get_post("").unwrap_err();
        assert!(matches!(err, ProcessError::InvalidArgument(_)));
    }

    #[test]
    fn test_get_post_paths_filters_by_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let posts = temp_dir.path().join("posts");
        std::fs::create_dir_all(posts.join("drafts.md")).unwrap();
        for name in ["a.md", "b.txt", "c.MD"] {
            std::fs::write(posts.join(name), "content").unwrap();
        }

        let processor = processor(temp_dir.path());

        assert_eq!(
            sorted_names(processor.get_post_paths(None).unwrap()),
            vec!["a.md", "c.MD"]
        );
        assert_eq!(
            sorted_names(processor.get_post_paths(Some("  ")).unwrap()),
            vec!["a.md", "c.MD"]
        );
    }

    #[test]
    fn test_get_post_paths_reflects_current_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let posts = temp_dir.path().join("posts");
        std::fs::create_dir_all(&posts).unwrap();
        std::fs::write(posts.join("a.md"), "content").unwrap();

        let processor = processor(temp_dir.path());
        assert_eq!(processor.get_post_paths(None).unwrap().count(), 1);

        std::fs::write(posts.join("b.md"), "content").unwrap();
        assert_eq!(processor.get_post_paths(None).unwrap().count(), 2);
    }

    #[test]
    fn test_get_post_paths_single() {
        let temp_dir = tempfile::tempdir().unwrap();
        let processor = processor(temp_dir.path());

        let paths: Vec<PathBuf> = processor
            .get_post_paths(Some("single.md"))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(paths, vec![temp_dir.path().join("posts").join("single.md")]);

        assert_eq!(processor.get_post_paths(Some("single.txt")).unwrap().count(), 0);
    }

    #[test]
    fn test_get_post_paths_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = processor(temp_dir.path()).get_post_paths(None).unwrap_err();
        assert!(matches!(err, ProcessError::Io { .. }));
    }

    #[test]
    fn test_get_model() {
        let processor = processor(Path::new("/blog"));

        let page: PostPage = processor.get_model("<p>Hi</p>").unwrap();
        assert_eq!(page.post, "<p>Hi</p>");
        assert!(matches!(
            processor.get_model::<PostPage>(""),
            Err(ProcessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_publish_file_name_uses_file_name_only() {
        let processor = processor(Path::new("/blog"));

        assert_eq!(
            processor.publish_file_name(Path::new("hello-world.md")).unwrap(),
            "date-released-hello-world.html"
        );
        assert_eq!(
            processor
                .publish_file_name(Path::new("/notes.md/archive/Trip.MD"))
                .unwrap(),
            "date-released-Trip.html"
        );
        assert_eq!(
            processor.publish_file_name(Path::new("readme.txt")).unwrap(),
            "date-released-readme.txt.html"
        );
        assert!(matches!(
            processor.publish_file_name(Path::new("/")),
            Err(ProcessError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_process_writes_published_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let processor = processor(temp_dir.path());

        let mut ctx = ProcessContext::new()
            .with(POST_PATH, "hello-world.md")
            .with(CONTENT, "<p>Hi</p>");
        assert!(processor.process(&mut ctx).await.unwrap());

        let expected = temp_dir.path().join("out").join("date-released-hello-world.html");
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "<p>Hi</p>");
        assert_eq!(
            ctx.require_str(PUBLISH_PATH).unwrap(),
            expected.to_string_lossy()
        );
    }

    #[tokio::test]
    async fn test_process_is_last_write_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let processor = processor(temp_dir.path());

        for content in ["<p>first</p>", "<p>second</p>"] {
            let mut ctx = ProcessContext::new()
                .with(POST_PATH, "posts/again.md")
                .with(CONTENT, content);
            processor.process(&mut ctx).await.unwrap();
        }

        let out = temp_dir.path().join("out");
        assert!(out.is_dir());
        assert_eq!(
            std::fs::read_to_string(out.join("date-released-again.html")).unwrap(),
            "<p>second</p>"
        );
    }

    #[test]
    fn test_process_blocking() {
        let temp_dir = tempfile::tempdir().unwrap();
        let processor = processor(temp_dir.path());

        let mut ctx = ProcessContext::new()
            .with(POST_PATH, "/elsewhere/drafts.md/hello.md")
            .with(CONTENT, "<p>Hi</p>");
        assert!(processor.process_blocking(&mut ctx).unwrap());

        let expected = temp_dir.path().join("out").join("date-released-hello.html");
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "<p>Hi</p>");
    }

    #[tokio::test]
    async fn test_blocking_variants_inside_runtime_fail_without_writing() {
        let files = Arc::new(MemoryFiles::default().with_file("/blog/posts/a.md", "*hi*"));
        let processor = memory_processor(files.clone());

        let mut ctx = ProcessContext::new()
            .with(POST_PATH, "a.md")
            .with(CONTENT, "<p>Hi</p>");
        let err = processor.process_blocking(&mut ctx).unwrap_err();
        assert!(matches!(err, ProcessError::Stage { .. }));
        assert!(!ctx.contains_key(PUBLISH_PATH));

        let err = processor.get_post("/blog/posts/a.md").unwrap_err();
        assert!(matches!(err, ProcessError::Io { .. }));
        assert!(files.ops().is_empty());
    }

    #[tokio::test]
    async fn test_process_missing_content_writes_nothing() {
        let files = Arc::new(MemoryFiles::default());
        let processor = memory_processor(files.clone());

        let mut ctx = ProcessContext::new().with(POST_PATH, "x.md");
        let err = processor.process(&mut ctx).await.unwrap_err();

        assert!(matches!(err, ProcessError::ContextMissingKey(key) if key == "content"));
        assert!(files.ops().is_empty());
        assert!(!ctx.contains_key(PUBLISH_PATH));
    }

    #[tokio::test]
    async fn test_process_cancelled_before_write() {
        let files = Arc::new(MemoryFiles::default());
        let processor = memory_processor(files.clone());
        let (handle, cancellation) = Cancellation::new();
        handle.cancel();

        let mut ctx = ProcessContext::new()
            .with(POST_PATH, "x.md")
            .with(CONTENT, "<p>x</p>")
            .with_cancellation(cancellation);
        let err = processor.process(&mut ctx).await.unwrap_err();

        assert!(matches!(err, ProcessError::Cancelled));
        assert!(files.ops().is_empty());
        assert!(!ctx.contains_key(PUBLISH_PATH));
    }

    #[tokio::test]
    async fn test_publish_with_cancelled_signal_writes_nothing() {
        let files = Arc::new(MemoryFiles::default());
        let processor = memory_processor(files.clone());
        let (handle, cancellation) = Cancellation::new();
        handle.cancel();

        let err = processor
            .publish(&PublishRequest::new("post.md", "<p>x</p>"), Some(&cancellation))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::Cancelled));
        assert!(files.ops().iter().all(|op| !op.starts_with("write")));
    }

    #[tokio::test]
    async fn test_publish_creates_directory_then_writes() {
        let files = Arc::new(MemoryFiles::default());
        let processor = memory_processor(files.clone());

        let path = processor
            .publish(&PublishRequest::new("post.md", "<p>x</p>"), None)
            .await
            .unwrap();

        assert_eq!(path, PathBuf::from("/blog/out/date-released-post.html"));
        assert_eq!(
            files.ops(),
            vec![
                "mkdir /blog/out",
                "write /blog/out/date-released-post.html"
            ]
        );
        assert_eq!(files.get(&path).unwrap(), "<p>x</p>");
    }
}
