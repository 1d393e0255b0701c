use tracing::debug;

use super::lexicon::{self, contains_any};
use super::types::UtteranceFacts;
use crate::config::EngineConfig;

/// Trimmed, lowercased, inner whitespace collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lowercased with whitespace and punctuation removed.
pub fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !is_punctuation(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '…' | '~' | '·' | '。' | '？' | '！' | '‘' | '’' | '“' | '”')
}

/// True when the text ends in "?" once trailing tildes, dots and bangs are ignored.
pub fn ends_with_question(text: &str) -> bool {
    text.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '~' | '!' | '.' | '…'))
        .ends_with(['?', '？'])
}

/// Any interrogative word, skipping indefinite uses such as "언제나" or "뭐든".
pub fn has_interrogative(text: &str) -> bool {
    let t = normalize(text);
    lexicon::INTERROGATIVES.iter().any(|word| {
        t.match_indices(word).any(|(at, _)| {
            let rest = &t[at + word.len()..];
            !(lexicon::INDEFINITE_STEMS.contains(word)
                && lexicon::INDEFINITE_SUFFIXES.iter().any(|s| rest.starts_with(s)))
        })
    })
}

pub fn addresses_agent(text: &str) -> bool {
    lexicon::AGENT_ADDRESS_RE.is_match(&normalize(text))
}

fn char_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

pub fn is_calling_pattern(text: &str) -> bool {
    let t = normalize(text);
    lexicon::CALLING_RES.iter().any(|re| re.is_match(&t))
}

/// Emphatic assertion shaped like a question. An interrogative word makes it a real question instead.
pub fn is_rhetorical_pattern(text: &str) -> bool {
    let t = normalize(text);
    if has_interrogative(&t) {
        return false;
    }
    lexicon::RHETORICAL_RES.iter().any(|re| re.is_match(&t))
}

/// First-person predication with a trailing "?" that asks nothing.
pub fn is_self_statement(text: &str) -> bool {
    let t = normalize(text);
    lexicon::FIRST_PERSON_START_RE.is_match(&t)
        && t.split(' ').count() >= 2
        && ends_with_question(&t)
        && !has_interrogative(&t)
        && !addresses_agent(&t)
}

/// Must only be trusted after `is_self_statement` has been ruled out; it checks that itself.
pub fn is_real_question(text: &str) -> bool {
    if is_self_statement(text) {
        return false;
    }
    has_interrogative(text) || (addresses_agent(text) && ends_with_question(text))
}

pub fn is_short_positive_reaction(text: &str) -> bool {
    let c = compact(text);
    if c.chars().count() <= 1 {
        // "왜?" and "뭐?" are questions, not nods.
        return !(ends_with_question(text) && has_interrogative(text));
    }
    // "좋아?" asks something; only the bare token is a reaction.
    if ends_with_question(text) {
        return false;
    }
    if lexicon::SHORT_POSITIVE_TOKENS.contains(&c.as_str()) {
        return true;
    }
    c.chars().all(|ch| matches!(ch, 'ㅋ' | 'ㅎ'))
}

fn keyword_short(text: &str, keywords: &[&str], max_chars: usize) -> bool {
    char_len(text) <= max_chars && contains_any(&compact(text), keywords)
}

pub fn is_gratitude(text: &str, max_chars: usize) -> bool {
    keyword_short(text, lexicon::GRATITUDE_KEYWORDS, max_chars) && !ends_with_question(text)
}

pub fn is_gratitude_question(text: &str, max_chars: usize) -> bool {
    keyword_short(text, lexicon::GRATITUDE_KEYWORDS, max_chars) && ends_with_question(text)
}

pub fn is_affection(text: &str, max_chars: usize) -> bool {
    keyword_short(text, lexicon::AFFECTION_KEYWORDS, max_chars) && !ends_with_question(text)
}

pub fn is_affection_question(text: &str, max_chars: usize) -> bool {
    keyword_short(text, lexicon::AFFECTION_KEYWORDS, max_chars) && ends_with_question(text)
}

/// Praise aimed at the agent ("너도 대단해?").
pub fn is_compliment(text: &str, max_chars: usize) -> bool {
    keyword_short(text, lexicon::PRAISE_KEYWORDS, max_chars) && addresses_agent(text)
}

pub fn is_safety_sensitive(text: &str) -> bool {
    contains_any(&compact(text), lexicon::SAFETY_KEYWORDS)
        || lexicon::ABUSE_RE.is_match(&normalize(text))
}

pub fn is_distressed(text: &str) -> bool {
    contains_any(&compact(text), lexicon::DISTRESS_KEYWORDS)
}

pub fn is_time_query(text: &str) -> bool {
    lexicon::TIME_QUERY_RE.is_match(&normalize(text)) && ends_with_question(text)
}

fn is_talking_about_own_worry(text: &str) -> bool {
    lexicon::OWN_WORRY_RE.is_match(&normalize(text))
}

fn asks_something(text: &str) -> bool {
    ends_with_question(text) || has_interrogative(text)
}

pub fn is_asking_about_agent_worry(text: &str) -> bool {
    // The user's own concerns win over any agent-directed reading.
    if is_talking_about_own_worry(text) {
        return false;
    }
    let t = normalize(text);
    if !asks_something(&t) {
        return false;
    }
    let worry_word = contains_any(&compact(&t), lexicon::WORRY_WORDS);
    (worry_word && addresses_agent(&t)) || lexicon::WORRY_ASK_RE.is_match(&t)
}

pub fn is_asking_about_agent_self(text: &str) -> bool {
    let t = normalize(text);
    if is_talking_about_own_worry(&t) || lexicon::FIRST_PERSON_START_RE.is_match(&t) {
        return false;
    }
    if !asks_something(&t) {
        return false;
    }
    if lexicon::SELF_SMALLTALK_RE.is_match(&t) {
        return true;
    }
    addresses_agent(&t) && lexicon::SELF_TOPIC_RE.is_match(&t)
}

/// Runs every predicate over one utterance.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    canned_keyword_max_chars: usize,
    compliment_max_chars: usize,
}

impl PatternClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            canned_keyword_max_chars: config.canned_keyword_max_chars,
            compliment_max_chars: config.compliment_max_chars,
        }
    }

    pub fn classify(&self, text: &str) -> UtteranceFacts {
        let max = self.canned_keyword_max_chars;

        // Ordered: self-statement first, real-question only when it fails.
        let self_statement = is_self_statement(text);
        let real_question = !self_statement && is_real_question(text);

        let facts = UtteranceFacts {
            calling: is_calling_pattern(text),
            rhetorical: is_rhetorical_pattern(text),
            self_statement,
            real_question,
            short_positive: is_short_positive_reaction(text),
            gratitude: is_gratitude(text, max),
            gratitude_question: is_gratitude_question(text, max),
            affection: is_affection(text, max),
            affection_question: is_affection_question(text, max),
            compliment: is_compliment(text, self.compliment_max_chars),
            safety_sensitive: is_safety_sensitive(text),
            distressed: is_distressed(text),
            asking_agent_worry: is_asking_about_agent_worry(text),
            asking_agent_self: is_asking_about_agent_self(text),
            time_query: is_time_query(text),
            has_question_mark: text.contains(['?', '？']),
            has_interrogative: has_interrogative(text),
            char_len: char_len(text),
        };

        debug!(?facts, "utterance classified");
        facts
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
