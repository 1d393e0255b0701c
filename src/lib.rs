pub mod config;
pub mod error;
pub mod kernel;
pub mod services;

// Re-export specific items for convenient access
pub use config::{BackendConfig, EngineConfig, PacingConfig};
pub use error::{BackendError, ConfigError};
pub use kernel::event::{ConversationTurn, ReplyRoute, Role, TurnOutcome, Utterance};
pub use kernel::mode::types::Mode;
pub use kernel::reactor::Reactor;
pub use services::llm::{ChatCompletionsBackend, ChatMessage, GenerationBackend};
