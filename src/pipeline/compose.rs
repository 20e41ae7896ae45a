use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::pipeline::generation::GenerationService;
use crate::pipeline::prompt;
use crate::pipeline::record::DigestRecord;

/// Partial update produced by the compose stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineUpdate {
    pub headline: String,
}

#[async_trait]
pub trait ComposeStage: Send + Sync {
    /// Composes a headline from the record's summary and tags.
    ///
    /// # Errors
    /// Returns an error when either input field is not populated or the
    /// generation call fails.
    async fn compose(&self, record: &DigestRecord) -> Result<HeadlineUpdate>;
}

/// Compose stage backed by the text-generation service.
///
/// The prompt embeds BOTH the summary and the tags; omitting either breaks
/// the stage contract.
pub struct LlmComposeStage {
    generator: Arc<dyn GenerationService>,
}

impl LlmComposeStage {
    #[must_use]
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ComposeStage for LlmComposeStage {
    async fn compose(&self, record: &DigestRecord) -> Result<HeadlineUpdate> {
        let summary = record
            .summary()
            .context("summary is not populated; the summarize stage must run first")?;
        let tags = record
            .tags()
            .context("tags are not populated; the tag stage must run first")?;
        let prompt = prompt::headline_prompt(summary, tags);

        debug!(prompt_chars = prompt.len(), "requesting headline");

        let generation = self
            .generator
            .invoke(&prompt)
            .await
            .context("headline generation failed")?;

        debug!(content_chars = generation.content.len(), "headline generated");

        Ok(HeadlineUpdate {
            headline: generation.content,
        })
    }
}
