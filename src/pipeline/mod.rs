//! Content processing.
//!
//! A processing step receives a `ProcessContext`, reads the keys it needs,
//! does its work and reports outputs back into the same context:
//!
//! ```ignore
//! let mut ctx = ProcessContext::new()
//!     .with(POST_PATH, "hello-world.md")
//!     .with(CONTENT, "<p>Hi</p>");
//! processor.process(&mut ctx).await?;
//! let written = ctx.require_str(PUBLISH_PATH)?;
//! ```
//!
//! Each step has a single async implementation. Blocking callers go through
//! `Processor::process_blocking`, which drives that same implementation.

mod context;
mod error;
mod post;

pub use context::{
    CONTENT, CancelHandle, Cancellation, POST_PATH, PUBLISH_PATH, ProcessContext, PublishRequest,
};
pub use error::ProcessError;
pub use post::{PUBLISH_PREFIX, PostPaths, PostProcessor};

use async_trait::async_trait;

use crate::util::block_on;

/// A step in the content processing pipeline.
#[async_trait]
pub trait Processor: Send + Sync {
    /// Unique name for this step (used in errors and logs).
    fn name(&self) -> &'static str;

    /// Run the step.
    ///
    /// Returns `Ok(true)` once the step has fully completed. Required keys
    /// missing from `ctx` fail with `ProcessError::ContextMissingKey`.
    async fn process(&self, ctx: &mut ProcessContext) -> Result<bool, ProcessError>;

    /// Run the step from synchronous code.
    ///
    /// Called from inside a tokio runtime it fails with `ProcessError::Stage`.
    fn process_blocking(&self, ctx: &mut ProcessContext) -> Result<bool, ProcessError> {
        block_on(self.process(ctx)).map_err(|e| ProcessError::stage(self.name(), e.to_string()))?
    }
}
