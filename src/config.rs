use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const ENGINE_CONFIG_ENV: &str = "JINWOO_ENGINE_CONFIG";

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Thresholds for classification, mode selection and sanitizing.
/// Every value here was tuned differently across revisions of the persona,
/// so they stay overridable instead of hard-coded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of agent turns allowed to pass without a question.
    pub force_question_every: u32,
    /// Utterances shorter than this (in chars, whitespace excluded) count as short.
    pub short_utterance_chars: usize,
    /// Utterances longer than this count as long and are never met with a forced question.
    pub long_utterance_chars: usize,
    /// Gratitude / affection keywords only trigger canned replies below this length.
    pub canned_keyword_max_chars: usize,
    pub compliment_max_chars: usize,
    /// Turns with index <= this value count as early in the conversation.
    pub early_turns: u32,
    /// Floor applied to every weight in the random mode table.
    pub min_weight: f64,
    /// Sanitized replies with fewer alphanumeric chars are replaced by a fallback.
    pub min_reply_chars: usize,
    pub exemplars_per_directive: usize,
    pub pacing: PacingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            force_question_every: 4,
            short_utterance_chars: 6,
            long_utterance_chars: 80,
            canned_keyword_max_chars: 6,
            compliment_max_chars: 15,
            early_turns: 2,
            min_weight: 0.01,
            min_reply_chars: 2,
            exemplars_per_directive: 2,
            pacing: PacingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Loads from the file named by `JINWOO_ENGINE_CONFIG`, or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(ENGINE_CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.force_question_every == 0 {
            return Err(ConfigError::Invalid {
                key: "force_question_every",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.short_utterance_chars >= self.long_utterance_chars {
            return Err(ConfigError::Invalid {
                key: "short_utterance_chars",
                reason: format!(
                    "{} is not below long_utterance_chars {}",
                    self.short_utterance_chars, self.long_utterance_chars
                ),
            });
        }
        if !(self.min_weight > 0.0) {
            return Err(ConfigError::Invalid {
                key: "min_weight",
                reason: "must be positive".to_string(),
            });
        }
        if self.min_reply_chars == 0 {
            return Err(ConfigError::Invalid {
                key: "min_reply_chars",
                reason: "must be at least 1".to_string(),
            });
        }
        self.pacing.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    /// Relative jitter, e.g. 0.1 for +/-10%.
    pub jitter: f64,
    pub short_user_chars: usize,
    pub short_reply_chars: usize,
    pub chars_per_sec_min: f64,
    pub chars_per_sec_max: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 0.3,
            max_delay_secs: 2.0,
            jitter: 0.10,
            short_user_chars: 20,
            short_reply_chars: 20,
            chars_per_sec_min: 8.0,
            chars_per_sec_max: 14.0,
        }
    }
}

impl PacingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_delay_secs >= 0.0 && self.min_delay_secs <= self.max_delay_secs) {
            return Err(ConfigError::Invalid {
                key: "pacing.min_delay_secs",
                reason: format!(
                    "expected 0 <= min ({}) <= max ({})",
                    self.min_delay_secs, self.max_delay_secs
                ),
            });
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(ConfigError::Invalid {
                key: "pacing.jitter",
                reason: format!("{} is outside [0, 1)", self.jitter),
            });
        }
        if !(self.chars_per_sec_min > 0.0 && self.chars_per_sec_min <= self.chars_per_sec_max) {
            return Err(ConfigError::Invalid {
                key: "pacing.chars_per_sec_min",
                reason: format!(
                    "expected 0 < min ({}) <= max ({})",
                    self.chars_per_sec_min, self.chars_per_sec_max
                ),
            });
        }
        Ok(())
    }
}

/// Connection settings for the chat-completions backend.
#[derive(Clone)]
pub struct BackendConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.7,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingKey("OPENAI_API_KEY"))?;

        let mut config = Self::new(api_key.trim());
        if let Ok(model) = std::env::var("JINWOO_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("JINWOO_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("JINWOO_TEMPERATURE") {
            config.temperature = raw.parse().map_err(|_| ConfigError::Invalid {
                key: "JINWOO_TEMPERATURE",
                reason: format!("'{}' is not a number", raw),
            })?;
        }
        if let Ok(raw) = std::env::var("JINWOO_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                key: "JINWOO_TIMEOUT_SECS",
                reason: format!("'{}' is not a whole number of seconds", raw),
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}
