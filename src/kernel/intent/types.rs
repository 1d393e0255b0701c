use serde::{Deserialize, Serialize};

/// Sub-type of a short positive reaction, picks the canned pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositiveKind {
    Gratitude,
    Affection,
    Generic,
}

/// Independent boolean facts about one utterance.
/// Several may hold at once; the mode selector resolves priority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceFacts {
    pub calling: bool,
    pub rhetorical: bool,
    pub self_statement: bool,
    pub real_question: bool,
    pub short_positive: bool,
    /// Gratitude keyword, short, no terminal "?".
    pub gratitude: bool,
    /// Gratitude keyword, short, terminal "?". Explained, not canned.
    pub gratitude_question: bool,
    pub affection: bool,
    pub affection_question: bool,
    pub compliment: bool,
    pub safety_sensitive: bool,
    pub distressed: bool,
    pub asking_agent_worry: bool,
    pub asking_agent_self: bool,
    pub time_query: bool,
    /// Any "?" in the text.
    pub has_question_mark: bool,
    pub has_interrogative: bool,
    /// Length in chars, whitespace excluded.
    pub char_len: usize,
}

impl UtteranceFacts {
    /// Canned-reply pool for rule 2 of the cascade.
    pub fn positive_kind(&self) -> PositiveKind {
        if self.gratitude {
            PositiveKind::Gratitude
        } else if self.affection {
            PositiveKind::Affection
        } else {
            PositiveKind::Generic
        }
    }

    pub fn invites_question(&self) -> bool {
        self.has_question_mark || self.has_interrogative
    }
}
