//! Judge configuration
//!
//! Resolution order, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, else `~/.config/citeval/config.toml` if present)
//! 3. Environment (`CITEVAL_API_BASE`, `CITEVAL_MODEL`, `CITEVAL_TIMEOUT`, `CITEVAL_RETRIES`)
//! 4. Command-line flags, applied by the caller

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bail_invalid;
use crate::error::{CitevalError, Result};

const CONFIG_DIR: &str = "citeval";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "CITEVAL_CONFIG_DIR";

/// Default chat-completions endpoint base
pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com";

/// Default judge model
pub const DEFAULT_MODEL: &str = "deepseek-reasoner";

/// Environment variable holding the API key unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// Fallback API key variable, checked when the configured one is unset
pub const FALLBACK_API_KEY_ENV: &str = "CITEVAL_API_KEY";

/// Reasoning models can take minutes per answer
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Accepted request timeout, in seconds
pub const TIMEOUT_BOUNDS: (u64, u64) = (5, 3600);

/// Retries beyond this would back off for hours
pub const MAX_RETRIES_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Base URL; requests go to `{api_base}/chat/completions`
    pub api_base: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// Sampling temperature; omitted from requests when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: None,
        }
    }
}

impl JudgeConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CitevalError::io_operation("read config", path.display(), e))?;
        let config: JudgeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration from an explicit file, the user config file, and
    /// the environment.
    ///
    /// An explicit path must exist. The user config file is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => match Self::user_config_path() {
                Some(path) if path.is_file() => {
                    tracing::debug!(path = %path.display(), "loading user config");
                    Self::load(&path)?
                }
                _ => Self::default(),
            },
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Location of the per-user config file, if a config directory exists.
    pub fn user_config_path() -> Option<PathBuf> {
        let dir = match std::env::var(CONFIG_DIR_ENV_VAR) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::config_dir()?.join(CONFIG_DIR),
        };
        Some(dir.join(CONFIG_FILE))
    }

    /// Apply environment overrides. Unparseable numbers are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var("CITEVAL_API_BASE") {
            if !base.is_empty() {
                self.api_base = base;
            }
        }

        if let Ok(model) = std::env::var("CITEVAL_MODEL") {
            if !model.is_empty() {
                self.model = model;
            }
        }

        if let Ok(timeout) = std::env::var("CITEVAL_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.timeout_seconds = seconds.clamp(TIMEOUT_BOUNDS.0, TIMEOUT_BOUNDS.1);
            }
        }

        if let Ok(retries) = std::env::var("CITEVAL_RETRIES") {
            if let Ok(count) = retries.parse::<u32>() {
                self.max_retries = count.min(MAX_RETRIES_LIMIT);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            bail_invalid!("api_base", &self.api_base);
        }
        if self.model.trim().is_empty() {
            bail_invalid!("model", "(empty)");
        }
        let (min_timeout, max_timeout) = TIMEOUT_BOUNDS;
        if !(min_timeout..=max_timeout).contains(&self.timeout_seconds) {
            bail_invalid!(
                "timeout_seconds",
                format!(
                    "{} (expected {}..={})",
                    self.timeout_seconds, min_timeout, max_timeout
                )
            );
        }
        if self.max_retries > MAX_RETRIES_LIMIT {
            bail_invalid!(
                "max_retries",
                format!("{} (at most {})", self.max_retries, MAX_RETRIES_LIMIT)
            );
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                bail_invalid!("temperature", t);
            }
        }
        Ok(())
    }

    /// Full chat-completions URL
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    /// Read the API key from `api_key_env`, falling back to `CITEVAL_API_KEY`.
    pub fn api_key(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
    }
}
