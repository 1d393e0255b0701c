use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::{ConversationTurn, Role};
use super::mode::types::Mode;

/// Strict state delta. This is the ONLY way dialogue state mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateDelta {
    /// One agent turn finished (generated, canned or fallback) with this mode.
    TurnCompleted { mode: Mode },
}

/// Short-term dialogue memory of one session.
///
/// `turn_index` and `last_question_turn_index` only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueState {
    last_mode: Option<Mode>,
    /// Agent-turn index of the latest asking turn; `None` until the first one.
    last_question_turn_index: Option<u32>,
    turn_index: u32,
    /// Monotonic mutation counter.
    version: u64,
}

impl DialogueState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_mode(&self) -> Option<Mode> {
        self.last_mode
    }

    pub fn last_question_turn_index(&self) -> Option<u32> {
        self.last_question_turn_index
    }

    /// Number of agent turns completed so far, also the index of the next one.
    pub fn turn_index(&self) -> u32 {
        self.turn_index
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Agent turns since the last question, counting "never" as index -1.
    pub fn question_gap(&self) -> u32 {
        match self.last_question_turn_index {
            Some(q) => self.turn_index.saturating_sub(q),
            None => self.turn_index.saturating_add(1),
        }
    }

    /// Pure reduction: State + Delta -> Mutated State
    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;

        match delta {
            StateDelta::TurnCompleted { mode } => {
                self.last_mode = Some(mode);
                if mode.is_asking() {
                    self.last_question_turn_index = Some(self.turn_index);
                }
                self.turn_index += 1;
            }
        }
    }
}

/// Ordered, append-only record of the conversation. Past turns are never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn agent_turns(&self) -> impl Iterator<Item = &ConversationTurn> {
        self.turns.iter().filter(|t| t.role == Role::Agent)
    }
}

/// Where a session keeps its dialogue state and log between turns.
pub trait SessionStore: Send {
    fn session_id(&self) -> Uuid;
    fn state(&self) -> &DialogueState;
    fn apply(&mut self, delta: StateDelta);
    fn append(&mut self, turn: ConversationTurn);
    fn log(&self) -> &ConversationLog;
}

/// Session held entirely in memory. Discarded with the process.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    id: Uuid,
    state: DialogueState,
    log: ConversationLog,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: DialogueState::new(),
            log: ConversationLog::new(),
        }
    }

    /// Resumes a session from previously exported parts.
    pub fn restore(id: Uuid, state: DialogueState, log: ConversationLog) -> Self {
        Self { id, state, log }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn session_id(&self) -> Uuid {
        self.id
    }

    fn state(&self) -> &DialogueState {
        &self.state
    }

    fn apply(&mut self, delta: StateDelta) {
        self.state.reduce(delta);
    }

    fn append(&mut self, turn: ConversationTurn) {
        self.log.append(turn);
    }

    fn log(&self) -> &ConversationLog {
        &self.log
    }
}
