//! Selector configuration.
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var | Default |
//! |---------|-----------------|------------------|---------|
//! | Credential | `MODELGATE_API_KEY` | `OPENROUTER_API_KEY` | none, required |
//! | Base URL | `MODELGATE_BASE_URL` | - | `https://openrouter.ai/api/v1` |
//! | Timeout | `MODELGATE_TIMEOUT_MS` | - | `10000` |
//!
//! The credential has no built-in default: a missing key is a startup error.

use std::env;
use std::fmt::{Debug, Formatter};

use crate::error::ConfigError;
use crate::filter::FilterPolicy;
use crate::http_client::{HttpAuth, DEFAULT_TIMEOUT_MS};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REFERER: &str = "https://github.com/modelgate/modelgate";
pub const DEFAULT_TITLE: &str = "modelgate";

/// Everything the fetcher and filter need to build a selector.
#[derive(Clone)]
pub struct SelectorConfig {
    credential: String,
    pub base_url: String,
    pub referer: String,
    pub title: String,
    pub timeout_ms: u64,
    pub policy: FilterPolicy,
}

impl SelectorConfig {
    /// Config with defaults and an explicit credential.
    pub fn new(credential: impl Into<String>) -> Result<Self, ConfigError> {
        let credential = credential.into();
        if credential.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        Ok(Self {
            credential,
            base_url: String::from(DEFAULT_BASE_URL),
            referer: String::from(DEFAULT_REFERER),
            title: String::from(DEFAULT_TITLE),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            policy: FilterPolicy::default(),
        })
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credential = lookup("MODELGATE_API_KEY")
            .filter(|value| !value.trim().is_empty())
            .or_else(|| lookup("OPENROUTER_API_KEY"))
            .ok_or(ConfigError::MissingCredential)?;

        let mut config = Self::new(credential)?;

        if let Some(base_url) = lookup("MODELGATE_BASE_URL") {
            config = config.with_base_url(base_url)?;
        }

        if let Some(raw) = lookup("MODELGATE_TIMEOUT_MS") {
            let timeout_ms = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or(ConfigError::InvalidTimeout { value: raw.clone() })?;
            config.timeout_ms = timeout_ms;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl { value: base_url });
        }
        self.base_url = base_url.trim_end_matches('/').to_owned();
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                value: timeout_ms.to_string(),
            });
        }
        self.timeout_ms = timeout_ms;
        Ok(self)
    }

    pub fn with_identity(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.referer = referer.into();
        self.title = title.into();
        self
    }

    pub fn with_policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn auth(&self) -> HttpAuth {
        HttpAuth::bearer(self.credential.as_str())
    }

    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }
}

impl Debug for SelectorConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorConfig")
            .field("credential", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("timeout_ms", &self.timeout_ms)
            .field("policy", &self.policy)
            .finish()
    }
}
