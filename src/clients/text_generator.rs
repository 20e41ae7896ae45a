use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::pipeline::generation::{Generation, GenerationService};

/// text-generatorクライアントの設定。
#[derive(Debug, Clone)]
pub(crate) struct TextGeneratorConfig {
    pub(crate) base_url: String,
    pub(crate) connect_timeout: Duration,
    pub(crate) total_timeout: Duration,
    pub(crate) service_token: Option<String>,
    pub(crate) model: String,
    pub(crate) temperature: f32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    content: String,
}

/// text-generatorとの通信を管理するクライアント。
#[derive(Debug, Clone)]
pub(crate) struct TextGeneratorClient {
    client: Client,
    base_url: Url,
    service_token: Option<String>,
    model: String,
    temperature: f32,
}

impl TextGeneratorClient {
    /// 新しいtext-generatorクライアントを作成する。
    ///
    /// # Errors
    /// URLのパースまたはHTTPクライアントの構築に失敗した場合はエラーを返します。
    pub(crate) fn new(config: TextGeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build text-generator HTTP client")?;

        let base_url = Url::parse(&config.base_url).context("invalid text-generator base URL")?;

        Ok(Self {
            client,
            base_url,
            service_token: config.service_token,
            model: config.model,
            temperature: config.temperature,
        })
    }

    pub(crate) async fn health_check(&self) -> Result<()> {
        let url = self
            .base_url
            .join("health")
            .context("failed to build text-generator health URL")?;

        self.client
            .get(url)
            .send()
            .await
            .context("text-generator health request failed")?
            .error_for_status()
            .context("text-generator health endpoint returned error status")?;

        Ok(())
    }
}

#[async_trait]
impl GenerationService for TextGeneratorClient {
    async fn invoke(&self, prompt: &str) -> Result<Generation> {
        let url = self
            .base_url
            .join("v1/generate")
            .context("failed to build text-generator generate URL")?;

        debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            "sending generation request to text-generator"
        );

        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            temperature: self.temperature,
        };

        let mut request = self.client.post(url).json(&request_body);

        // Add service authentication token if configured
        if let Some(ref token) = self.service_token {
            request = request.header("X-Service-Token", token);
        }

        let response = request
            .send()
            .await
            .context("text-generator generate request failed")?
            .error_for_status()
            .context("text-generator generate endpoint returned error status")?;

        let generated: GenerateResponse = response
            .json()
            .await
            .context("failed to deserialize text-generator response")?;

        debug!(
            content_chars = generated.content.len(),
            "generation received"
        );

        Ok(Generation {
            content: generated.content,
        })
    }
}
