use thiserror::Error;

/// Failures of the generation backend. The turn pipeline never surfaces these;
/// they route the turn onto the empathy fallback.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend returned no usable text")]
    Empty,

    #[error("backend response could not be decoded: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    MissingKey(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
}
