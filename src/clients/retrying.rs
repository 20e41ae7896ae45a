use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, warn};

use crate::pipeline::generation::{Generation, GenerationService};
use crate::util::error::{ErrorKind, classify_error};
use crate::util::retry::RetryConfig;

/// 生成サービス呼び出しを指数バックオフ付きで再試行するデコレーター。
///
/// ステージから見れば1回の `invoke` のまま。再試行はこの層の内側で完結する。
#[derive(Clone)]
pub(crate) struct RetryingGenerator {
    inner: Arc<dyn GenerationService>,
    retry: RetryConfig,
}

impl RetryingGenerator {
    pub(crate) fn new(inner: Arc<dyn GenerationService>, retry: RetryConfig) -> Self {
        Self { inner, retry }
    }
}

#[async_trait]
impl GenerationService for RetryingGenerator {
    async fn invoke(&self, prompt: &str) -> Result<Generation> {
        let mut attempt = 0;

        loop {
            match self.inner.invoke(prompt).await {
                Ok(generation) => return Ok(generation),
                Err(err) => match classify_error(&err) {
                    ErrorKind::Retryable if self.retry.can_retry(attempt + 1) => {
                        attempt += 1;
                        let delay = self.retry.delay_for_attempt(attempt);
                        warn!(attempt, delay = ?delay, "generation call failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    ErrorKind::Retryable | ErrorKind::NonRetryable => return Err(err),
                    ErrorKind::Fatal => {
                        error!("generation call failed with a fatal error");
                        return Err(err);
                    }
                },
            }
        }
    }
}
