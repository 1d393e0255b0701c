use regex::Regex;
use std::sync::LazyLock;

use super::catalog::fallback_pool;
use crate::config::EngineConfig;
use crate::kernel::mode::types::Mode;

/// Meta talk about being a model. Stripped in every mode.
const BANNED_META: &[&str] = &[
    "AI로서",
    "ai로서",
    "인공지능으로서",
    "언어 모델로서",
    "언어 모델",
    "언어모델",
    "저는 AI",
    "나는 AI",
    "챗봇으로서",
];

const BANNED_APOLOGY: &[&str] = &[
    "죄송합니다",
    "죄송해요",
    "죄송해",
    "죄송",
    "미안하지만",
    "미안해요",
    "사과할게",
];

/// Conversation-about-the-conversation and stock counter-questions.
/// Asking and self-disclosure modes keep these.
const BANNED_META_QUESTIONS: &[&str] = &[
    "무엇을 도와드릴까요?",
    "도와드릴까요?",
    "더 궁금한 거 있어?",
    "궁금한 게 있으면 언제든지 말해줘",
    "대화해줘서 고마워",
    "이야기해줘서 고마워",
    "얘기해줘서 고마워",
    "어떻게 생각해?",
    "너는 어때?",
];

static SPEAKER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:진우|jinwoo)\s*[:：]\s*").unwrap());

static WRAPPING_QUOTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*["“'‘](.*)["”'’]\s*$"#).unwrap());

static SPACE_BEFORE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.!?~…,])").unwrap());

const MAX_PASSES: usize = 8;

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '~' | '…')
}

fn alnum_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

/// Sentence budget for a mode.
pub fn sentence_ceiling(mode: Mode) -> usize {
    match mode {
        Mode::EmpathyAsk | Mode::SelfDisclosure => 2,
        _ => 1,
    }
}

fn uses_narrow_ban_list(mode: Mode) -> bool {
    matches!(mode, Mode::Ask | Mode::EmpathyAsk | Mode::SelfDisclosure)
}

fn strip_banned(text: &str, mode: Mode) -> String {
    let mut lists: Vec<&[&str]> = vec![BANNED_META, BANNED_APOLOGY];
    if !uses_narrow_ban_list(mode) {
        lists.push(BANNED_META_QUESTIONS);
    }

    let mut current = text.to_string();
    // Removal can splice a new banned phrase together, so run to a fixpoint.
    loop {
        let mut next = current.clone();
        for phrase in lists.iter().flat_map(|l| l.iter()) {
            if next.contains(phrase) {
                next = next.replace(phrase, " ");
            }
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse_whitespace(line: &str) -> String {
    let joined = line.split_whitespace().collect::<Vec<_>>().join(" ");
    SPACE_BEFORE_PUNCT_RE.replace_all(&joined, "$1").into_owned()
}

/// Splits on newlines and on terminal punctuation runs followed by a space.
/// Fragments without any letters or digits are dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let line = collapse_whitespace(line);
        let chars: Vec<char> = line.chars().collect();
        let mut current = String::new();

        for (i, &c) in chars.iter().enumerate() {
            current.push(c);
            let boundary = is_terminal(c) && chars.get(i + 1).map_or(true, |n| n.is_whitespace());
            if boundary {
                push_sentence(&mut sentences, &current);
                current.clear();
            }
        }
        push_sentence(&mut sentences, &current);
    }

    sentences
}

/// Drops speaker labels, wrapping quotes and leading punctuation from one fragment.
fn clean_fragment(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let mut next = SPEAKER_PREFIX_RE.replace(&current, "").into_owned();
        next = WRAPPING_QUOTES_RE.replace(&next, "$1").into_owned();
        next = next
            .trim()
            .trim_start_matches([',', '.', '!', '?', '~', '…'])
            .trim()
            .to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let cleaned = clean_fragment(raw);
    if alnum_count(&cleaned) > 0 {
        sentences.push(cleaned);
    }
}

fn force_question(text: &str) -> String {
    if text.contains('?') {
        return text.to_string();
    }
    let stem = text.trim_end_matches(|c: char| matches!(c, '.' | '!' | '~' | '…' | ','));
    format!("{}?", stem)
}

/// Sanitized text plus whether a fallback line stood in for degenerate output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    pub fell_back: bool,
}

/// Enforces output-shape rules on generated or templated text.
///
/// Total and idempotent: `sanitize(sanitize(x, m), m) == sanitize(x, m)`.
#[derive(Debug, Clone)]
pub struct ReplySanitizer {
    min_reply_chars: usize,
}

impl ReplySanitizer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_reply_chars: config.min_reply_chars,
        }
    }

    fn min_chars(&self, mode: Mode) -> usize {
        if mode.is_canned() {
            1
        } else {
            self.min_reply_chars
        }
    }

    pub fn is_degenerate(&self, text: &str, mode: Mode) -> bool {
        alnum_count(text) < self.min_chars(mode)
    }

    pub fn sanitize(&self, raw: &str, mode: Mode) -> String {
        self.sanitize_report(raw, mode).text
    }

    /// Like `sanitize`, but also reports whether any pass substituted a fallback.
    pub fn sanitize_report(&self, raw: &str, mode: Mode) -> Sanitized {
        // Every pass only removes text, appends a single "?" or swaps in a
        // fixed fallback, so this settles within two or three passes.
        let (mut current, mut fell_back) = self.sanitize_once(raw, mode);
        for _ in 0..MAX_PASSES {
            let (next, substituted) = self.sanitize_once(&current, mode);
            fell_back |= substituted;
            if next == current {
                break;
            }
            current = next;
        }
        Sanitized {
            text: current,
            fell_back,
        }
    }

    fn sanitize_once(&self, raw: &str, mode: Mode) -> (String, bool) {
        let stripped = strip_banned(raw, mode);

        let kept: Vec<String> = split_sentences(&stripped)
            .into_iter()
            .take(sentence_ceiling(mode))
            .collect();
        let text = kept.join(" ");

        if self.is_degenerate(&text, mode) {
            let pool = fallback_pool(mode);
            let index = raw.chars().count() % pool.len();
            return (pool[index].to_string(), true);
        }

        if mode.is_asking() {
            (force_question(&text), false)
        } else {
            (text, false)
        }
    }
}

impl Default for ReplySanitizer {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Sanitizes with default thresholds.
pub fn sanitize(raw: &str, mode: Mode) -> String {
    ReplySanitizer::default().sanitize(raw, mode)
}
