use std::sync::Arc;

use anyhow::{Context, Result};

use crate::{
    clients::{RetryingGenerator, TextGeneratorClient, TextGeneratorConfig},
    config::Config,
    pipeline::DigestPipeline,
    pipeline::generation::GenerationService,
    util::retry::RetryConfig,
};

pub struct ComponentRegistry {
    config: Arc<Config>,
    text_generator_client: Arc<TextGeneratorClient>,
    pipeline: DigestPipeline,
}

impl ComponentRegistry {
    /// 構成情報と依存をまとめて初期化し、アプリケーションの共有レジストリを構築する。
    ///
    /// `HTTP_MAX_RETRIES` が0より大きい場合、生成サービスクライアントは
    /// 再試行デコレーターでラップされる。
    ///
    /// # Errors
    /// HTTPクライアントの構築に失敗した場合はエラーを返す。
    pub fn build(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let text_generator_client = Arc::new(
            TextGeneratorClient::new(TextGeneratorConfig {
                base_url: config.text_generator_base_url().to_string(),
                connect_timeout: config.text_generator_connect_timeout(),
                total_timeout: config.text_generator_total_timeout(),
                service_token: config.text_generator_service_token().map(ToString::to_string),
                model: config.llm_model().to_string(),
                temperature: config.llm_temperature(),
            })
            .context("failed to build text-generator client")?,
        );

        let generator: Arc<dyn GenerationService> = if config.http_max_retries() > 0 {
            let retry_config = RetryConfig::new(
                config.http_max_retries(),
                config.http_backoff_base_ms(),
                config.http_backoff_cap_ms(),
            );
            Arc::new(RetryingGenerator::new(
                Arc::clone(&text_generator_client) as Arc<dyn GenerationService>,
                retry_config,
            ))
        } else {
            Arc::clone(&text_generator_client) as Arc<dyn GenerationService>
        };

        let pipeline = DigestPipeline::new(generator);

        Ok(Self {
            config,
            text_generator_client,
            pipeline,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn pipeline(&self) -> &DigestPipeline {
        &self.pipeline
    }

    /// 生成サービスの死活確認を行う。
    ///
    /// # Errors
    /// ヘルスエンドポイントへの到達に失敗した場合はエラーを返す。
    pub async fn health_check(&self) -> Result<()> {
        self.text_generator_client.health_check().await
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
