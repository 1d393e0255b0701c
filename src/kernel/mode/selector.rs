use rand::Rng;
use tracing::debug;

use super::types::{CannedKind, DirectiveHint, Mode, Selection, SelectionReason};
use crate::config::EngineConfig;
use crate::kernel::intent::types::{PositiveKind, UtteranceFacts};
use crate::kernel::state::DialogueState;

/// Modes eligible for the weighted draw, in walk order.
pub const WEIGHTED_MODES: [Mode; 5] = [
    Mode::ShortEmpathy,
    Mode::Empathy,
    Mode::Reflect,
    Mode::Ask,
    Mode::EmpathyAsk,
];

const BASE_WEIGHTS: [f64; 5] = [0.20, 0.30, 0.20, 0.15, 0.15];

const QUESTION_INVITE_BONUS: f64 = 0.10;
const REPEAT_ASK_DAMPING: f64 = 0.3;
const REPEAT_ASK_EMPATHY_BONUS: f64 = 0.15;
const EARLY_ASK_DAMPING: f64 = 0.5;

/// Weight per weighted mode. Order is fixed and defines the cumulative walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    weights: [f64; 5],
}

impl WeightTable {
    pub fn base() -> Self {
        Self {
            weights: BASE_WEIGHTS,
        }
    }

    fn slot(mode: Mode) -> Option<usize> {
        WEIGHTED_MODES.iter().position(|m| *m == mode)
    }

    pub fn get(&self, mode: Mode) -> f64 {
        Self::slot(mode).map(|i| self.weights[i]).unwrap_or(0.0)
    }

    pub fn set(&mut self, mode: Mode, weight: f64) {
        if let Some(i) = Self::slot(mode) {
            self.weights[i] = weight;
        }
    }

    pub fn add(&mut self, mode: Mode, delta: f64) {
        self.set(mode, self.get(mode) + delta);
    }

    pub fn scale(&mut self, mode: Mode, factor: f64) {
        self.set(mode, self.get(mode) * factor);
    }

    /// Raises every weight to at least `floor` so no mode becomes unreachable.
    pub fn clamp_min(&mut self, floor: f64) {
        for w in self.weights.iter_mut() {
            *w = w.max(floor);
        }
    }

    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Mode, f64)> + '_ {
        WEIGHTED_MODES.iter().copied().zip(self.weights.iter().copied())
    }

    /// Draws uniformly over the summed weight range and walks the cumulative distribution.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Mode {
        let total = self.total();
        let draw = rng.gen::<f64>() * total;
        let mut cumulative = 0.0;
        for (mode, weight) in self.entries() {
            cumulative += weight;
            if draw < cumulative {
                return mode;
            }
        }
        // Only reachable through float rounding at the top of the range.
        self.entries()
            .filter(|(_, w)| *w > 0.0)
            .last()
            .map(|(m, _)| m)
            .unwrap_or(Mode::Empathy)
    }
}

/// Decides the mode of a turn from classifier facts and short-term state.
#[derive(Debug, Clone)]
pub struct ModeSelector {
    force_question_every: u32,
    short_utterance_chars: usize,
    long_utterance_chars: usize,
    early_turns: u32,
    min_weight: f64,
}

impl ModeSelector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            force_question_every: config.force_question_every,
            short_utterance_chars: config.short_utterance_chars,
            long_utterance_chars: config.long_utterance_chars,
            early_turns: config.early_turns,
            min_weight: config.min_weight,
        }
    }

    /// Ordered decision cascade. The weighted draw is the only random step.
    pub fn select<R: Rng + ?Sized>(
        &self,
        facts: &UtteranceFacts,
        state: &DialogueState,
        rng: &mut R,
    ) -> Selection {
        if let Some(selection) = self.shortcut(facts, state) {
            return selection;
        }

        let table = self.weight_table(facts, state);
        let mode = table.sample(rng);
        debug!(?table, %mode, "weighted mode drawn");

        let reason = if facts.real_question {
            SelectionReason::RealQuestion
        } else {
            SelectionReason::Weighted
        };
        Selection::generated(mode, reason)
    }

    /// Rules 1-7: every deterministic outcome. `None` means the weighted draw decides.
    pub fn shortcut(&self, facts: &UtteranceFacts, state: &DialogueState) -> Option<Selection> {
        use SelectionReason as R;

        // 1. Safety lock.
        if facts.safety_sensitive {
            return Some(
                Selection::generated(Mode::Empathy, R::Safety).with_hint(DirectiveHint::SafetyComfort),
            );
        }

        // 2. Short positive, gratitude and affection get a literal acknowledgement.
        if facts.short_positive || facts.gratitude || facts.affection {
            let kind = match facts.positive_kind() {
                PositiveKind::Gratitude => CannedKind::Thanks,
                PositiveKind::Affection => CannedKind::Affection,
                PositiveKind::Generic => CannedKind::Ack,
            };
            return Some(Selection::canned(Mode::SimpleAck, R::ShortPositive, kind));
        }

        // 3. Calling / rhetorical.
        if facts.calling {
            return Some(Selection::canned(Mode::Reaction, R::Calling, CannedKind::Calling));
        }
        if facts.rhetorical {
            return Some(Selection::canned(Mode::Reaction, R::Rhetorical, CannedKind::Rhetorical));
        }

        // 4. Time query.
        if facts.time_query {
            return Some(Selection::canned(Mode::Reaction, R::TimeQuery, CannedKind::TimeOfDay));
        }

        // 5. Questions about the agent itself.
        if facts.asking_agent_worry {
            return Some(Selection::generated(Mode::Worry, R::AgentWorry));
        }
        if facts.asking_agent_self {
            return Some(Selection::generated(Mode::SelfDisclosure, R::AgentSelf));
        }

        // 6. Self-statements are never answered with a question.
        if facts.self_statement {
            let mode = if self.is_short(facts) {
                Mode::ShortEmpathy
            } else {
                Mode::Empathy
            };
            return Some(Selection::generated(mode, R::SelfStatement));
        }

        if facts.compliment {
            return Some(
                Selection::generated(Mode::ShortEmpathy, R::Compliment)
                    .with_hint(DirectiveHint::HumbleReturnCompliment),
            );
        }
        if facts.gratitude_question {
            return Some(
                Selection::generated(Mode::Empathy, R::GratitudeQuestion)
                    .with_hint(DirectiveHint::ExplainGratitude),
            );
        }
        if facts.affection_question {
            return Some(
                Selection::generated(Mode::Empathy, R::AffectionQuestion)
                    .with_hint(DirectiveHint::ExplainAffection),
            );
        }

        // 7. Forced-question cadence.
        if state.question_gap() >= self.force_question_every && self.accepts_forced_question(facts) {
            let mode = if state.turn_index() <= self.early_turns {
                Mode::EmpathyAsk
            } else {
                Mode::Ask
            };
            debug!(gap = state.question_gap(), %mode, "question forced by cadence");
            return Some(Selection::generated(mode, R::ForcedQuestion));
        }

        None
    }

    /// Rules 8-9: base weights, adjustments, floor, then the real-question override.
    pub fn weight_table(&self, facts: &UtteranceFacts, state: &DialogueState) -> WeightTable {
        let mut table = WeightTable::base();

        if facts.invites_question() {
            table.add(Mode::Ask, QUESTION_INVITE_BONUS);
            table.add(Mode::EmpathyAsk, QUESTION_INVITE_BONUS);
        }

        if state.last_mode().is_some_and(Mode::is_asking) {
            table.scale(Mode::Ask, REPEAT_ASK_DAMPING);
            table.scale(Mode::EmpathyAsk, REPEAT_ASK_DAMPING);
            table.add(Mode::Empathy, REPEAT_ASK_EMPATHY_BONUS);
        }

        if state.turn_index() < self.early_turns {
            table.scale(Mode::Ask, EARLY_ASK_DAMPING);
            table.scale(Mode::EmpathyAsk, EARLY_ASK_DAMPING);
        }

        table.clamp_min(self.min_weight);

        if facts.real_question {
            table.scale(Mode::Empathy, 2.0);
            table.scale(Mode::ShortEmpathy, 1.5);
            table.scale(Mode::Reflect, 0.5);
            table.set(Mode::Ask, 0.0);
            table.set(Mode::EmpathyAsk, 0.0);
        }

        table
    }

    fn is_short(&self, facts: &UtteranceFacts) -> bool {
        facts.char_len < self.short_utterance_chars
    }

    fn accepts_forced_question(&self, facts: &UtteranceFacts) -> bool {
        !self.is_short(facts) && facts.char_len <= self.long_utterance_chars && !facts.distressed
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
