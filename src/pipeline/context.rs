//! Processing context: the inputs and outputs of one processing step.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;
use tokio::sync::watch;

use super::ProcessError;

/// Key holding the path of the post being processed.
pub const POST_PATH: &str = "postpath";
/// Key holding the content to publish.
pub const CONTENT: &str = "content";
/// Key a publish step reports the written file under.
pub const PUBLISH_PATH: &str = "publishpath";

/// String-keyed values handed to a single processing step.
///
/// Created by the caller for one invocation and discarded afterwards.
/// Steps read their required keys up front and fail with
/// `ProcessError::ContextMissingKey` when one is absent.
#[derive(Debug, Clone, Default)]
pub struct ProcessContext {
    items: HashMap<String, Value>,
    cancellation: Option<Cancellation>,
}

impl ProcessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Attach a cancellation signal checked before anything is written.
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Get a required string value.
    pub fn require_str(&self, key: &str) -> Result<&str, ProcessError> {
        match self.items.get(key) {
            None => Err(ProcessError::ContextMissingKey(key.to_string())),
            Some(Value::String(value)) => Ok(value.as_str()),
            Some(other) => Err(ProcessError::invalid(format!(
                "context key '{key}' must be a string, got {other}"
            ))),
        }
    }

    pub fn cancellation(&self) -> Option<&Cancellation> {
        self.cancellation.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(Cancellation::is_cancelled)
    }
}

/// The typed inputs of a publish step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub post_path: PathBuf,
    pub content: String,
}

impl PublishRequest {
    pub fn new(post_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            post_path: post_path.into(),
            content: content.into(),
        }
    }
}

impl TryFrom<&ProcessContext> for PublishRequest {
    type Error = ProcessError;

    fn try_from(ctx: &ProcessContext) -> Result<Self, Self::Error> {
        let post_path = ctx.require_str(POST_PATH)?;
        let content = ctx.require_str(CONTENT)?;
        Ok(Self::new(post_path, content))
    }
}

/// Receiving side of a cancellation signal.
///
/// Async publish steps check it before issuing a write; a write that has
/// already started is never interrupted.
#[derive(Debug, Clone)]
pub struct Cancellation {
    rx: watch::Receiver<bool>,
}

/// Sending side of a cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl Cancellation {
    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, Self { rx })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}
