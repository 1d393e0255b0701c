use serde::{Deserialize, Serialize};

use crate::error::BackendError;
use crate::kernel::event::ReplyRoute;
use crate::kernel::mode::types::{Mode, SelectionReason};

// Allowed: modes, enums, counts, durations
// Forbidden: utterance text, reply text, prompt text, backend error bodies

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    SessionOpened,

    ModeSelected {
        turn_index: u32,
        mode: Mode,
        reason: SelectionReason,
    },

    /// `gap` is the question gap observed before the selection.
    QuestionGap {
        gap: u32,
    },

    ReplyProduced {
        mode: Mode,
        route: ReplyRoute,
        delay_ms: u64,
    },

    BackendFailed {
        kind: BackendFailureKind,
    },

    /// The sanitizer replaced degenerate output with a mode fallback.
    SanitizerFallback {
        mode: Mode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendFailureKind {
    Transport,
    Status,
    Empty,
    Decode,
}

impl From<&BackendError> for BackendFailureKind {
    fn from(err: &BackendError) -> Self {
        match err {
            BackendError::Http(_) => BackendFailureKind::Transport,
            BackendError::Status { .. } => BackendFailureKind::Status, // Body STRIPPED
            BackendError::Empty => BackendFailureKind::Empty,
            BackendError::Decode(_) => BackendFailureKind::Decode,
        }
    }
}
