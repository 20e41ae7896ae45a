use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::pipeline::generation::GenerationService;
use crate::pipeline::prompt;
use crate::pipeline::record::DigestRecord;

/// Partial update produced by the summarize stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryUpdate {
    pub summary: String,
}

#[async_trait]
pub trait SummarizeStage: Send + Sync {
    /// Produces a summary for the record's topic.
    ///
    /// # Errors
    /// Returns an error when the generation call fails.
    async fn summarize(&self, record: &DigestRecord) -> Result<SummaryUpdate>;
}

/// Summarize stage backed by the text-generation service.
///
/// Sends one prompt embedding the topic and stores the response content
/// verbatim. The topic itself is never a valid output.
pub struct LlmSummarizeStage {
    generator: Arc<dyn GenerationService>,
}

impl LlmSummarizeStage {
    #[must_use]
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl SummarizeStage for LlmSummarizeStage {
    async fn summarize(&self, record: &DigestRecord) -> Result<SummaryUpdate> {
        let prompt = prompt::summary_prompt(record.topic());

        debug!(prompt_chars = prompt.len(), "requesting topic summary");

        let generation = self
            .generator
            .invoke(&prompt)
            .await
            .context("summary generation failed")?;

        debug!(content_chars = generation.content.len(), "summary generated");

        Ok(SummaryUpdate {
            summary: generation.content,
        })
    }
}
