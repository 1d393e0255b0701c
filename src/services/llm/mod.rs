pub mod client;

pub use client::{ChatCompletionsBackend, ChatMessage, ChatRole, GenerationBackend};
