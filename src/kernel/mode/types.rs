use serde::{Deserialize, Serialize};
use std::fmt;

/// Discourse act chosen for one agent turn. Exactly one per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    SimpleAck,
    Empathy,
    ShortEmpathy,
    Reflect,
    Ask,
    EmpathyAsk,
    Worry,
    SelfDisclosure,
    /// Literal reaction: calling, rhetorical and time-query replies.
    Reaction,
}

impl Mode {
    pub const ALL: [Mode; 9] = [
        Mode::SimpleAck,
        Mode::Empathy,
        Mode::ShortEmpathy,
        Mode::Reflect,
        Mode::Ask,
        Mode::EmpathyAsk,
        Mode::Worry,
        Mode::SelfDisclosure,
        Mode::Reaction,
    ];

    /// Modes whose reply must carry a question.
    pub fn is_asking(self) -> bool {
        matches!(self, Mode::Ask | Mode::EmpathyAsk)
    }

    /// Replies of these modes never reach the generation backend.
    pub fn is_canned(self) -> bool {
        matches!(self, Mode::SimpleAck | Mode::Reaction)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::SimpleAck => "SIMPLE_ACK",
            Mode::Empathy => "EMPATHY",
            Mode::ShortEmpathy => "SHORT_EMPATHY",
            Mode::Reflect => "REFLECT",
            Mode::Ask => "ASK",
            Mode::EmpathyAsk => "EMPATHY_ASK",
            Mode::Worry => "WORRY",
            Mode::SelfDisclosure => "SELF_DISCLOSURE",
            Mode::Reaction => "REACTION",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule of the cascade produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionReason {
    Safety,
    ShortPositive,
    Calling,
    Rhetorical,
    TimeQuery,
    AgentWorry,
    AgentSelf,
    SelfStatement,
    Compliment,
    GratitudeQuestion,
    AffectionQuestion,
    ForcedQuestion,
    Weighted,
    RealQuestion,
}

/// Which literal pool a canned reply is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CannedKind {
    Thanks,
    Affection,
    Ack,
    Calling,
    Rhetorical,
    TimeOfDay,
}

/// Extra steering for the generation backend on top of the mode template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveHint {
    None,
    /// Crisis topic: comfort only, no advice, no questions.
    SafetyComfort,
    HumbleReturnCompliment,
    ExplainGratitude,
    ExplainAffection,
}

/// Output of the mode selector for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mode: Mode,
    pub reason: SelectionReason,
    /// Set when the turn bypasses generation.
    pub canned: Option<CannedKind>,
    pub hint: DirectiveHint,
}

impl Selection {
    pub fn generated(mode: Mode, reason: SelectionReason) -> Self {
        Self {
            mode,
            reason,
            canned: None,
            hint: DirectiveHint::None,
        }
    }

    pub fn canned(mode: Mode, reason: SelectionReason, kind: CannedKind) -> Self {
        Self {
            mode,
            reason,
            canned: Some(kind),
            hint: DirectiveHint::None,
        }
    }

    pub fn with_hint(mut self, hint: DirectiveHint) -> Self {
        self.hint = hint;
        self
    }
}
