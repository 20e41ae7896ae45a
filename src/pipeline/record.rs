use anyhow::{Result, ensure};

use crate::pipeline::{compose::HeadlineUpdate, summarize::SummaryUpdate, tag::TagsUpdate};

/// Shared record threaded through the digest pipeline.
///
/// Created with only `topic` populated; each stage adds exactly one field.
/// Fields are write-once: downstream stages treat everything written before
/// them as read-only, and a second write to the same field is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRecord {
    topic: String,
    summary: Option<String>,
    tags: Option<String>,
    headline: Option<String>,
}

impl DigestRecord {
    /// Creates a record for the given topic with all derived fields unset.
    ///
    /// # Errors
    /// Returns an error when the topic is empty or whitespace-only.
    pub fn new(topic: impl Into<String>) -> Result<Self> {
        let topic = topic.into();
        ensure!(!topic.trim().is_empty(), "digest topic must not be empty");

        Ok(Self {
            topic,
            summary: None,
            tags: None,
            headline: None,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    #[must_use]
    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        self.headline.as_deref()
    }

    /// # Errors
    /// Returns an error when a summary has already been recorded.
    pub fn apply_summary(&mut self, update: SummaryUpdate) -> Result<()> {
        ensure!(self.summary.is_none(), "summary is already recorded");
        self.summary = Some(update.summary);
        Ok(())
    }

    /// # Errors
    /// Returns an error when tags have already been recorded.
    pub fn apply_tags(&mut self, update: TagsUpdate) -> Result<()> {
        ensure!(self.tags.is_none(), "tags are already recorded");
        self.tags = Some(update.tags);
        Ok(())
    }

    /// # Errors
    /// Returns an error when a headline has already been recorded.
    pub fn apply_headline(&mut self, update: HeadlineUpdate) -> Result<()> {
        ensure!(self.headline.is_none(), "headline is already recorded");
        self.headline = Some(update.headline);
        Ok(())
    }
}
