//! Runtime configuration, loaded from environment variables with defaults.

use serde::{Deserialize, Serialize};

/// One safety-filter entry forwarded verbatim with every generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

impl SafetySetting {
    pub fn block_none(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            threshold: "BLOCK_NONE".to_string(),
        }
    }
}

/// AdScope runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Generative-service API credential (`GEN_AI`).
    pub api_key: Option<String>,
    /// Generation model identifier.
    pub model: String,
    /// Deadline for the generation call, in seconds.
    pub generation_timeout_secs: u64,
    /// Deadline applied to each individual upload and delete call, in seconds.
    pub http_timeout_secs: u64,
    /// Harm-category thresholds. Categories not listed here fall through to
    /// the remote service's defaults.
    pub safety_settings: Vec<SafetySetting>,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "models/gemini-1.5-pro-latest".to_string(),
            generation_timeout_secs: 600,
            http_timeout_secs: 120,
            safety_settings: default_safety_settings(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Self {
            api_key: std::env::var("GEN_AI").ok().filter(|k| !k.is_empty()),
            model: std::env::var("ADSCOPE_MODEL").unwrap_or(defaults.model),
            generation_timeout_secs: std::env::var("ADSCOPE_GENERATION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.generation_timeout_secs),
            http_timeout_secs: std::env::var("ADSCOPE_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            safety_settings: defaults.safety_settings,
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}

/// Reference safety configuration: the three recognized harm categories,
/// each fully permissive on our side.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    vec![
        SafetySetting::block_none("HARM_CATEGORY_HARASSMENT"),
        SafetySetting::block_none("HARM_CATEGORY_HATE_SPEECH"),
        SafetySetting::block_none("HARM_CATEGORY_DANGEROUS_CONTENT"),
    ]
}
