use anyhow::Result;
use async_trait::async_trait;

/// Single completion returned by the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub content: String,
}

/// Seam to the external text-generation service.
///
/// One `invoke` call yields one generation; the caller decides what to do
/// with the content. Implementations must not retry internally — retry
/// behavior is layered on top as a decorator.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends a single prompt to the service and returns its generation.
    ///
    /// # Errors
    /// Returns an error when the service call fails; callers propagate it
    /// unchanged rather than substituting a fallback value.
    async fn invoke(&self, prompt: &str) -> Result<Generation>;
}
