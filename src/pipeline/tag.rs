use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::pipeline::generation::GenerationService;
use crate::pipeline::prompt;
use crate::pipeline::record::DigestRecord;

/// Partial update produced by the tag stage. The tags stay an opaque string;
/// no keyword/category structure is parsed out of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsUpdate {
    pub tags: String,
}

#[async_trait]
pub trait TagStage: Send + Sync {
    /// Extracts keywords and a category for the record's summary.
    ///
    /// # Errors
    /// Returns an error when the summary is not populated or the generation
    /// call fails.
    async fn tag(&self, record: &DigestRecord) -> Result<TagsUpdate>;
}

/// Tag stage backed by the text-generation service.
///
/// The prompt embeds the summary produced upstream, never the raw topic.
pub struct LlmTagStage {
    generator: Arc<dyn GenerationService>,
}

impl LlmTagStage {
    #[must_use]
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl TagStage for LlmTagStage {
    async fn tag(&self, record: &DigestRecord) -> Result<TagsUpdate> {
        let summary = record
            .summary()
            .context("summary is not populated; the summarize stage must run first")?;
        let prompt = prompt::tags_prompt(summary);

        debug!(prompt_chars = prompt.len(), "requesting summary tags");

        let generation = self
            .generator
            .invoke(&prompt)
            .await
            .context("tag generation failed")?;

        debug!(content_chars = generation.content.len(), "tags generated");

        Ok(TagsUpdate {
            tags: generation.content,
        })
    }
}
