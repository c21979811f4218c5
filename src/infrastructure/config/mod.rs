//! Run settings
//!
//! Defaults, overridden by an optional `tabulador.toml`, overridden by
//! `TABULADOR_`-prefixed environment variables. The API key is only ever
//! read from the environment.

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use crate::domain::retry::RetryPolicy;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "tabulador.toml";
const API_KEY_ENV: &str = "TABULADOR_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub provider: LLMProvider,
    pub base_url: String,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub max_attempts: u32,
    pub backoff_secs: u64,
    pub segmentation: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let llm = LLMConfig::default();
        let retry = RetryPolicy::default();
        Self {
            provider: llm.provider,
            base_url: llm.base_url,
            model: llm.model,
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
            max_attempts: retry.max_attempts,
            backoff_secs: retry.backoff_secs,
            segmentation: true,
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed("TABULADOR_").ignore(&["API_KEY"]))
            .extract()
            .map_err(|e| AppError::Internal(format!("Failed to load settings: {}", e)))
    }

    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            provider: self.provider.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: std::env::var(API_KEY_ENV).ok(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff_secs)
    }
}
