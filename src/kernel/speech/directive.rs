use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::{WorryCatalog, STYLE_EXEMPLARS};
use super::sanitizer::sentence_ceiling;
use crate::kernel::mode::types::{DirectiveHint, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionRule {
    Required,
    Forbidden,
    Optional,
}

/// Constraint bundle handed to the generation backend for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDirective {
    pub mode: Mode,
    pub max_sentences: usize,
    pub question: QuestionRule,
    pub tone: &'static str,
    pub task: &'static str,
    pub banned_moves: Vec<&'static str>,
    pub exemplars: Vec<&'static str>,
    /// WORRY only: the reply must be exactly one of these, verbatim.
    pub worry_candidates: Vec<&'static str>,
    pub hint: DirectiveHint,
}

const BANNED_MOVES: &[&str] = &[
    "사과하지 마",
    "대화 자체에 대해 말하지 마",
    "AI라는 걸 드러내지 마",
    "조언이나 해결책을 먼저 꺼내지 마",
];

fn question_rule(mode: Mode) -> QuestionRule {
    match mode {
        Mode::Ask | Mode::EmpathyAsk => QuestionRule::Required,
        Mode::SelfDisclosure => QuestionRule::Optional,
        _ => QuestionRule::Forbidden,
    }
}

fn tone(mode: Mode) -> &'static str {
    match mode {
        Mode::Empathy | Mode::ShortEmpathy | Mode::EmpathyAsk => "따뜻하고 편한 반말",
        Mode::Reflect => "차분한 반말",
        Mode::Ask => "궁금해하는 가벼운 반말",
        Mode::Worry | Mode::SelfDisclosure => "솔직하고 담백한 반말",
        Mode::SimpleAck | Mode::Reaction => "짧고 가벼운 반말",
    }
}

fn task(mode: Mode) -> &'static str {
    match mode {
        Mode::SimpleAck => "짧게 맞장구만 쳐.",
        Mode::Empathy => "상대 감정에 공감만 해. 질문하지 마.",
        Mode::ShortEmpathy => "아주 짧게 공감해. 한두 마디면 충분해.",
        Mode::Reflect => "상대가 한 말을 네 말로 되짚어 줘.",
        Mode::Ask => "상대 얘기에 이어지는 질문을 하나만 해.",
        Mode::EmpathyAsk => "먼저 공감하고, 이어서 자연스러운 질문을 하나 해.",
        Mode::Worry => "아래 후보 중 하나를 골라 그대로 말해. 고치거나 덧붙이지 마.",
        Mode::SelfDisclosure => "네 요즘 얘기를 솔직하게 짧게 해. 필요하면 되물어도 돼.",
        Mode::Reaction => "짧게 반응만 해.",
    }
}

fn hint_line(hint: DirectiveHint) -> Option<&'static str> {
    match hint {
        DirectiveHint::None => None,
        DirectiveHint::SafetyComfort => Some(
            "상대가 많이 힘든 상태야. 판단이나 조언 없이 곁에 있다는 느낌만 전해. 절대 질문하지 마.",
        ),
        DirectiveHint::HumbleReturnCompliment => {
            Some("칭찬을 받았어. 겸손하게 받고 상대를 다시 칭찬해 줘.")
        }
        DirectiveHint::ExplainGratitude => {
            Some("상대가 왜 고맙냐고 되묻는 거야. 고마운 이유를 짧게 설명해.")
        }
        DirectiveHint::ExplainAffection => {
            Some("상대가 애정 표현을 확인하는 거야. 왜 그렇게 생각하는지 짧게 말해.")
        }
    }
}

/// Maps a mode to its constraint bundle. Never touches the network.
#[derive(Debug, Clone)]
pub struct DirectiveBuilder {
    exemplars_per_directive: usize,
    worries: WorryCatalog,
}

impl DirectiveBuilder {
    pub fn new(exemplars_per_directive: usize, worries: WorryCatalog) -> Self {
        Self {
            exemplars_per_directive,
            worries,
        }
    }

    pub fn build<R: Rng + ?Sized>(&self, mode: Mode, hint: DirectiveHint, rng: &mut R) -> StyleDirective {
        let exemplars = STYLE_EXEMPLARS
            .choose_multiple(rng, self.exemplars_per_directive)
            .copied()
            .collect();

        let worry_candidates = if mode == Mode::Worry {
            self.worries.lines().to_vec()
        } else {
            Vec::new()
        };

        let question = match hint {
            DirectiveHint::SafetyComfort => QuestionRule::Forbidden,
            _ => question_rule(mode),
        };

        StyleDirective {
            mode,
            max_sentences: sentence_ceiling(mode),
            question,
            tone: tone(mode),
            task: task(mode),
            banned_moves: BANNED_MOVES.to_vec(),
            exemplars,
            worry_candidates,
            hint,
        }
    }
}

impl Default for DirectiveBuilder {
    fn default() -> Self {
        Self::new(2, WorryCatalog::standard())
    }
}

impl StyleDirective {
    /// Natural-language instruction sent as a system message.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("[이번 답변 방식: {}]", self.mode),
            self.task.to_string(),
            format!("최대 {}문장.", self.max_sentences),
        ];

        lines.push(
            match self.question {
                QuestionRule::Required => "반드시 물음표로 끝나는 질문을 하나 넣어.",
                QuestionRule::Forbidden => "질문하지 마. 물음표를 쓰지 마.",
                QuestionRule::Optional => "질문은 해도 되고 안 해도 돼.",
            }
            .to_string(),
        );
        lines.push(format!("말투: {}", self.tone));

        if let Some(hint) = hint_line(self.hint) {
            lines.push(hint.to_string());
        }

        lines.push(format!("금지: {}", self.banned_moves.join(" / ")));

        if !self.worry_candidates.is_empty() {
            lines.push("후보:".to_string());
            for candidate in &self.worry_candidates {
                lines.push(format!("- {}", candidate));
            }
        }

        if !self.exemplars.is_empty() {
            lines.push(format!("말투 예시: {}", self.exemplars.join(" / ")));
        }

        lines.join("\n")
    }
}
