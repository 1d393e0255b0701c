//! Static matching rules for the pattern classifier.
//!
//! All tables are read-only after first use and shared freely across sessions.
//! Keyword lists are matched against the compact form of an utterance
//! (lowercased, whitespace and punctuation removed) unless noted otherwise;
//! regexes run on the normalized form (trimmed, single spaces).

use regex::Regex;
use std::sync::LazyLock;

/// Pure vocative: "친구야?", "진우야?", "야?".
pub static CALLING_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^(?:친구|진우|너|얘|야)(?:야|아)~*\?+$").unwrap(),
        Regex::new(r"^(?:친구|진우|야)~*\?+$").unwrap(),
    ]
});

/// Question-shaped emphasis: "그게 맞는 거야?", "알잖아?".
pub static RHETORICAL_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r".+(?:거|것)(?:야|이야|니)~*\?+$").unwrap(),
        Regex::new(r".+잖아~*\?+$").unwrap(),
        Regex::new(r"^그게\s*.+\?+$").unwrap(),
    ]
});

/// Second-person reference to the agent. `너무` and friends must not match.
pub static AGENT_ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:너(?:는|도|가|한테|랑|의|를|만|\b)|넌|니가|네가|니\s|진우)").unwrap()
});

/// First-person subject opening the utterance.
pub static FIRST_PERSON_START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:나|난|나는|내가|나도|저|전|저는|제가|저도)(?:\s|$)").unwrap()
});

pub const INTERROGATIVES: &[&str] = &[
    "뭐", "뭘", "무슨", "무엇", "언제", "어디", "누구", "누가", "왜", "어떻게", "어때", "어땠",
    "어떤", "몇", "얼마", "어느",
];

pub const SHORT_POSITIVE_TOKENS: &[&str] = &[
    "응", "ㅇㅇ", "웅", "ㅇ", "응응", "웅웅", "오키", "오케이", "ok", "okay", "굿", "good", "ㅋㅋ",
    "ㅎㅎ", "ㅋㅋㅋ", "ㅎㅎㅎ", "넵", "네", "예", "그래", "그래그래", "좋아", "좋아좋아", "맞아",
    "맞아맞아", "인정", "고마워", "고마웡", "고맙다", "감사", "감사해", "땡큐", "thx", "사랑해",
    "최고", "짱",
];

pub const GRATITUDE_KEYWORDS: &[&str] = &["고마", "고맙", "감사", "땡큐", "thank", "thx"];

pub const AFFECTION_KEYWORDS: &[&str] = &["베프", "친구", "짱", "사랑", "좋아해", "최고"];

pub const PRAISE_KEYWORDS: &[&str] = &[
    "대단", "멋지", "멋있", "최고", "잘하", "잘한", "착하", "착한", "똑똑", "예뻐", "예쁘", "귀여",
    "귀엽", "훌륭", "천재",
];

/// Crisis and acute distress. Any hit locks the turn to plain empathy.
pub const SAFETY_KEYWORDS: &[&str] = &[
    "자살", "죽고싶", "죽을래", "죽어버리", "자해", "손목긋", "극단적", "살기싫", "사라지고싶",
    "번아웃", "탈진", "학대", "폭력", "폭행", "공황", "불안장애", "불안해",
    "우울증", "우울해", "우울하",
];

/// Being hit by someone. Bare "맞았어" or "때려" alone is everyday speech
/// ("답 맞았어", "회사 때려치울까"), so each branch needs an aggressor or a victim.
pub static ABUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:아빠|엄마|부모님|남친|남자친구|여친|여자친구|선배|형|오빠|누나|언니|누가)\S*\s+(?:(?:자꾸|또|매일|계속)\s+)?(?:(?:나를?|날)\s+)?때(?:려|렸|리)(?:$|[^치])|(?:한테|에게)\s*(?:맞았|맞고|맞아서)|(?:^|\s)(?:날|나를)\s+때(?:려|렸|리)(?:$|[^치])",
    )
    .unwrap()
});

/// Everyday negative emotion. Suppresses forced questions, nothing more.
pub const DISTRESS_KEYWORDS: &[&str] = &[
    "힘들", "힘드", "슬퍼", "슬프", "속상", "서운", "외로", "지쳤", "지친", "짜증", "화나", "눈물",
    "울고", "울었", "괴로", "답답", "스트레스",
];

pub static TIME_QUERY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"몇\s*시|시간\s*(?:이|은)?\s*(?:몇|어떻게)|what\s+time").unwrap()
});

/// The user talking about their own worries. Checked before any agent-worry rule.
pub static OWN_WORRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|\s)(?:내|나|난|나는|나도|제|저|저는)\s*(?:고민|걱정)|고민\s*(?:이|좀)?\s*있는데|고민\s*상담|들어\s*줄래|들어\s*줘",
    )
    .unwrap()
});

pub const WORRY_WORDS: &[&str] = &["고민", "걱정", "힘든거", "힘든일", "힘든점", "스트레스"];

/// "고민 있어?" style asks that target the listener without naming them.
pub static WORRY_ASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:고민|걱정)(?:\s*(?:이|은|거리))?\s*(?:있어|있냐|있니|없어|뭐)").unwrap()
});

pub static SELF_TOPIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"요즘|오늘|뭐\s*해|뭐\s*하|어때|어땠|지내|좋아하|취미|기분|꿈|나이|몇\s*살|어디\s*살|먹었|잤어|일어났",
    )
    .unwrap()
});

/// Whole-utterance small talk aimed at the listener, subject dropped.
pub static SELF_SMALLTALK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:뭐\s*해|뭐\s*하고\s*있어|뭐\s*하는\s*중|요즘\s*어때|요즘\s*뭐\s*해|잘\s*지내|잘\s*지냈어|밥\s*먹었어|오늘\s*어땠어|기분\s*어때)[~!]*\?+$",
    )
    .unwrap()
});

/// Interrogative stems that turn indefinite with a suffix: "언제나", "누구든", "왜냐하면".
pub const INDEFINITE_STEMS: &[&str] = &["뭐", "왜", "언제", "누구", "어디"];

pub const INDEFINITE_SUFFIXES: &[&str] = &[
    "나", "든", "라도", "서나", "서든", "에서나", "에서든", "냐하", "냐면",
];

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
