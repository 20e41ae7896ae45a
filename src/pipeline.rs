use std::sync::Arc;

use anyhow::Result;
use tracing::debug;
use uuid::Uuid;

pub mod compose;
pub mod generation;
pub(crate) mod prompt;
pub mod record;
pub mod summarize;
pub mod tag;

use compose::{ComposeStage, LlmComposeStage};
use generation::GenerationService;
use record::DigestRecord;
use summarize::{LlmSummarizeStage, SummarizeStage};
use tag::{LlmTagStage, TagStage};

/// Orchestrates the three digest stages over one shared record.
///
/// Stages run strictly in order: summarize, tag, compose. The record is
/// owned here and mutated only between stage calls; each stage sees the
/// fields written before it as read-only input.
pub struct DigestPipeline {
    stages: PipelineStages,
}

struct PipelineStages {
    summarize: Arc<dyn SummarizeStage>,
    tag: Arc<dyn TagStage>,
    compose: Arc<dyn ComposeStage>,
}

pub struct DigestPipelineBuilder {
    summarize: Option<Arc<dyn SummarizeStage>>,
    tag: Option<Arc<dyn TagStage>>,
    compose: Option<Arc<dyn ComposeStage>>,
}

impl DigestPipeline {
    /// Builds the production pipeline: every stage backed by the given
    /// generation service.
    #[must_use]
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self::builder()
            .with_summarize_stage(Arc::new(LlmSummarizeStage::new(Arc::clone(&generator))))
            .with_tag_stage(Arc::new(LlmTagStage::new(Arc::clone(&generator))))
            .with_compose_stage(Arc::new(LlmComposeStage::new(generator)))
            .build()
    }

    #[must_use]
    pub fn builder() -> DigestPipelineBuilder {
        DigestPipelineBuilder::new()
    }

    /// Runs the full digest for one topic and returns the completed record.
    ///
    /// # Errors
    /// Returns an error when the topic is empty or any stage fails; a stage
    /// failure propagates unchanged and leaves the run unfinished.
    pub async fn run(&self, topic: &str) -> Result<DigestRecord> {
        let run_id = Uuid::new_v4();
        let mut record = DigestRecord::new(topic)?;

        debug!(run_id = %run_id, "digest pipeline started");

        let summary = self.stages.summarize.summarize(&record).await?;
        record.apply_summary(summary)?;

        let tags = self.stages.tag.tag(&record).await?;
        record.apply_tags(tags)?;

        let headline = self.stages.compose.compose(&record).await?;
        record.apply_headline(headline)?;

        debug!(run_id = %run_id, "digest pipeline completed");

        Ok(record)
    }
}

impl DigestPipelineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            summarize: None,
            tag: None,
            compose: None,
        }
    }

    #[must_use]
    pub fn with_summarize_stage(mut self, stage: Arc<dyn SummarizeStage>) -> Self {
        self.summarize = Some(stage);
        self
    }

    #[must_use]
    pub fn with_tag_stage(mut self, stage: Arc<dyn TagStage>) -> Self {
        self.tag = Some(stage);
        self
    }

    #[must_use]
    pub fn with_compose_stage(mut self, stage: Arc<dyn ComposeStage>) -> Self {
        self.compose = Some(stage);
        self
    }

    /// # Panics
    /// Panics when any stage has not been configured.
    #[must_use]
    pub fn build(self) -> DigestPipeline {
        let stages = PipelineStages {
            summarize: self
                .summarize
                .unwrap_or_else(|| panic!("summarize stage must be configured before build")),
            tag: self
                .tag
                .unwrap_or_else(|| panic!("tag stage must be configured before build")),
            compose: self
                .compose
                .unwrap_or_else(|| panic!("compose stage must be configured before build")),
        };

        DigestPipeline { stages }
    }
}

impl Default for DigestPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
