use std::{env, time::Duration};

use thiserror::Error;

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    text_generator_base_url: String,
    text_generator_service_token: Option<String>,
    text_generator_connect_timeout: Duration,
    text_generator_total_timeout: Duration,
    llm_model: String,
    llm_temperature: f32,
    http_max_retries: usize,
    http_backoff_base_ms: u64,
    http_backoff_cap_ms: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から Digest Worker の設定値を読み込み、検証する。
    ///
    /// # Errors
    /// `TEXT_GENERATOR_BASE_URL` が未設定、もしくは各種値のパースに失敗した場合は
    /// [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let text_generator_base_url = env_var("TEXT_GENERATOR_BASE_URL")?;
        let text_generator_service_token = env::var("TEXT_GENERATOR_SERVICE_TOKEN").ok();
        let text_generator_connect_timeout =
            parse_duration_ms("TEXT_GENERATOR_CONNECT_TIMEOUT_MS", 3000)?;
        let text_generator_total_timeout =
            parse_duration_ms("TEXT_GENERATOR_TOTAL_TIMEOUT_MS", 60000)?;

        let llm_model = env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let llm_temperature = parse_temperature("LLM_TEMPERATURE", 0.3)?;

        // Retry settings (exponential backoff + jitter)
        let http_max_retries = parse_usize("HTTP_MAX_RETRIES", 3)?;
        let http_backoff_base_ms = parse_u64("HTTP_BACKOFF_BASE_MS", 250)?;
        let http_backoff_cap_ms = parse_u64("HTTP_BACKOFF_CAP_MS", 10000)?;

        Ok(Self {
            text_generator_base_url,
            text_generator_service_token,
            text_generator_connect_timeout,
            text_generator_total_timeout,
            llm_model,
            llm_temperature,
            http_max_retries,
            http_backoff_base_ms,
            http_backoff_cap_ms,
        })
    }

    #[must_use]
    pub fn text_generator_base_url(&self) -> &str {
        &self.text_generator_base_url
    }

    #[must_use]
    pub fn text_generator_service_token(&self) -> Option<&str> {
        self.text_generator_service_token.as_deref()
    }

    #[must_use]
    pub fn text_generator_connect_timeout(&self) -> Duration {
        self.text_generator_connect_timeout
    }

    #[must_use]
    pub fn text_generator_total_timeout(&self) -> Duration {
        self.text_generator_total_timeout
    }

    #[must_use]
    pub fn llm_model(&self) -> &str {
        &self.llm_model
    }

    #[must_use]
    pub fn llm_temperature(&self) -> f32 {
        self.llm_temperature
    }

    #[must_use]
    pub fn http_max_retries(&self) -> usize {
        self.http_max_retries
    }

    #[must_use]
    pub fn http_backoff_base_ms(&self) -> u64 {
        self.http_backoff_base_ms
    }

    #[must_use]
    pub fn http_backoff_cap_ms(&self) -> u64 {
        self.http_backoff_cap_ms
    }
}

fn env_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_duration_ms(name: &'static str, default_ms: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default_ms.to_string());
    let ms = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(ms))
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_temperature(name: &'static str, default: f32) -> Result<f32, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let parsed = raw.parse::<f32>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    if !(0.0..=2.0).contains(&parsed) {
        return Err(ConfigError::Invalid {
            name,
            source: anyhow::anyhow!("temperature must be between 0.0 and 2.0"),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_env(name: &str, value: &str) {
        // SAFETY: tests run sequentially under ENV_MUTEX and assign valid UTF-8 values.
        unsafe {
            env::set_var(name, value);
        }
    }

    fn remove_env(name: &str) {
        // SAFETY: tests run sequentially under ENV_MUTEX and clean up deterministic keys.
        unsafe {
            env::remove_var(name);
        }
    }

    fn reset_env() {
        remove_env("TEXT_GENERATOR_BASE_URL");
        remove_env("TEXT_GENERATOR_SERVICE_TOKEN");
        remove_env("TEXT_GENERATOR_CONNECT_TIMEOUT_MS");
        remove_env("TEXT_GENERATOR_TOTAL_TIMEOUT_MS");
        remove_env("LLM_MODEL");
        remove_env("LLM_TEMPERATURE");
        remove_env("HTTP_MAX_RETRIES");
        remove_env("HTTP_BACKOFF_BASE_MS");
        remove_env("HTTP_BACKOFF_CAP_MS");
    }

    #[test]
    fn from_env_uses_defaults_when_optional_missing() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("TEXT_GENERATOR_BASE_URL", "http://localhost:8001/");

        let config = Config::from_env().expect("config should load");

        assert_eq!(config.text_generator_base_url(), "http://localhost:8001/");
        assert!(config.text_generator_service_token().is_none());
        assert_eq!(
            config.text_generator_connect_timeout(),
            Duration::from_millis(3000)
        );
        assert_eq!(
            config.text_generator_total_timeout(),
            Duration::from_millis(60000)
        );
        assert_eq!(config.llm_model(), "gemini-2.5-flash");
        assert!((config.llm_temperature() - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.http_max_retries(), 3);
        assert_eq!(config.http_backoff_base_ms(), 250);
        assert_eq!(config.http_backoff_cap_ms(), 10000);
    }

    #[test]
    fn from_env_overrides_values() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("TEXT_GENERATOR_BASE_URL", "https://generator.example.com/");
        set_env("TEXT_GENERATOR_SERVICE_TOKEN", "secret-token");
        set_env("TEXT_GENERATOR_CONNECT_TIMEOUT_MS", "5000");
        set_env("TEXT_GENERATOR_TOTAL_TIMEOUT_MS", "120000");
        set_env("LLM_MODEL", "gemini-2.5-pro");
        set_env("LLM_TEMPERATURE", "0.7");
        set_env("HTTP_MAX_RETRIES", "5");
        set_env("HTTP_BACKOFF_BASE_MS", "500");
        set_env("HTTP_BACKOFF_CAP_MS", "20000");

        let config = Config::from_env().expect("config should load");

        assert_eq!(
            config.text_generator_base_url(),
            "https://generator.example.com/"
        );
        assert_eq!(config.text_generator_service_token(), Some("secret-token"));
        assert_eq!(
            config.text_generator_connect_timeout(),
            Duration::from_millis(5000)
        );
        assert_eq!(
            config.text_generator_total_timeout(),
            Duration::from_millis(120_000)
        );
        assert_eq!(config.llm_model(), "gemini-2.5-pro");
        assert!((config.llm_temperature() - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.http_max_retries(), 5);
        assert_eq!(config.http_backoff_base_ms(), 500);
        assert_eq!(config.http_backoff_cap_ms(), 20000);
    }

    #[test]
    fn from_env_errors_when_base_url_missing() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();

        let error = Config::from_env().expect_err("missing base URL should fail");

        assert!(matches!(
            error,
            ConfigError::Missing("TEXT_GENERATOR_BASE_URL")
        ));
    }

    #[test]
    fn from_env_rejects_out_of_range_temperature() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("TEXT_GENERATOR_BASE_URL", "http://localhost:8001/");
        set_env("LLM_TEMPERATURE", "3.5");

        let error = Config::from_env().expect_err("out-of-range temperature should fail");

        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "LLM_TEMPERATURE",
                ..
            }
        ));
    }

    #[test]
    fn from_env_rejects_unparsable_retry_count() {
        let _lock = ENV_MUTEX.lock().expect("env mutex");
        reset_env();
        set_env("TEXT_GENERATOR_BASE_URL", "http://localhost:8001/");
        set_env("HTTP_MAX_RETRIES", "many");

        let error = Config::from_env().expect_err("unparsable retry count should fail");

        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "HTTP_MAX_RETRIES",
                ..
            }
        ));
    }
}
