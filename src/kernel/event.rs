use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::kernel::mode::types::{Mode, SelectionReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

/// One entry of the append-only conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            content: content.into(),
        }
    }
}

/// Raw text of one user turn. Immutable for the lifetime of the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in chars, whitespace excluded.
    pub fn char_len(&self) -> usize {
        self.0.chars().filter(|c| !c.is_whitespace()).count()
    }
}

impl From<&str> for Utterance {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// How the reply text of a turn was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplyRoute {
    /// Literal reply, no backend call.
    Canned,
    /// Backend text passed through the sanitizer.
    Generated,
    /// Backend failed; literal empathy line used instead.
    BackendFallback,
}

/// Everything the presentation layer needs for one finished turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: ConversationTurn,
    pub mode: Mode,
    pub reason: SelectionReason,
    pub route: ReplyRoute,
    /// Minimum time to wait before showing the reply.
    pub delay: Duration,
}
