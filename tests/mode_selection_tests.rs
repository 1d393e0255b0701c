use jinwoo::config::EngineConfig;
use jinwoo::kernel::intent::{PatternClassifier, UtteranceFacts};
use jinwoo::kernel::mode::{
    CannedKind, DirectiveHint, Mode, ModeSelector, SelectionReason, WeightTable,
};
use jinwoo::kernel::state::{DialogueState, StateDelta};
use rand::rngs::StdRng;
use rand::SeedableRng;

const MEDIUM: &str = "오늘 회사에서 회의가 길게 이어졌어";

fn state_after(modes: &[Mode]) -> DialogueState {
    let mut state = DialogueState::new();
    for mode in modes {
        state.reduce(StateDelta::TurnCompleted { mode: *mode });
    }
    state
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_safety_locks_to_empathy() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();

    let inputs = ["요즘 너무 우울해", "요즘 너무 우울해, 너는 뭐해?", "고마워 근데 죽고 싶어?"];
    let states = [
        state_after(&[]),
        state_after(&[Mode::Empathy, Mode::Empathy, Mode::Reflect, Mode::Empathy]),
        state_after(&[Mode::Ask]),
    ];

    for (i, text) in inputs.iter().enumerate() {
        let facts = classifier.classify(text);
        assert!(facts.safety_sensitive, "{text}");
        for state in &states {
            let mut rng = StdRng::seed_from_u64(i as u64);
            let selection = selector.select(&facts, state, &mut rng);
            assert_eq!(selection.mode, Mode::Empathy);
            assert_eq!(selection.reason, SelectionReason::Safety);
            assert_eq!(selection.hint, DirectiveHint::SafetyComfort);
            assert!(selection.canned.is_none());
        }
    }
}

#[test]
fn test_self_statement_never_asks() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    // Gap is far past the cadence; the cadence must still yield.
    let overdue = state_after(&[Mode::Empathy; 6]);

    for text in ["나 오늘 좀 지쳤어?", "나 어제 시험 망했어?", "난 괜찮아?"] {
        let facts = classifier.classify(text);
        assert!(facts.self_statement, "{text}");
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = selector.select(&facts, &overdue, &mut rng);
            assert!(!selection.mode.is_asking(), "{text} -> {}", selection.mode);
        }
    }

    let facts = classifier.classify("난 괜찮아?");
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(selector.select(&facts, &overdue, &mut rng).mode, Mode::ShortEmpathy);
}

#[test]
fn test_canned_shortcuts() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let state = DialogueState::new();
    let mut rng = StdRng::seed_from_u64(7);

    let cases = [
        ("응", Mode::SimpleAck, CannedKind::Ack),
        ("고마워", Mode::SimpleAck, CannedKind::Thanks),
        ("사랑해", Mode::SimpleAck, CannedKind::Affection),
        ("친구야?", Mode::Reaction, CannedKind::Calling),
        ("그게 맞는 거야?", Mode::Reaction, CannedKind::Rhetorical),
        ("지금 몇 시야?", Mode::Reaction, CannedKind::TimeOfDay),
    ];

    for (text, mode, kind) in cases {
        let selection = selector.select(&classifier.classify(text), &state, &mut rng);
        assert_eq!(selection.mode, mode, "{text}");
        assert_eq!(selection.canned, Some(kind), "{text}");
        assert!(!selection.mode.is_asking());
    }
}

#[test]
fn test_questions_about_the_agent() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let state = DialogueState::new();
    let mut rng = StdRng::seed_from_u64(1);

    let worry = selector.select(&classifier.classify("너는 요즘 고민 있어?"), &state, &mut rng);
    assert_eq!(worry.mode, Mode::Worry);
    assert_eq!(worry.reason, SelectionReason::AgentWorry);

    let own = selector.select(
        &classifier.classify("나 요즘 고민 있는데 들어줄래?"),
        &state,
        &mut rng,
    );
    assert_ne!(own.mode, Mode::Worry);

    let small_talk = selector.select(&classifier.classify("뭐 해?"), &state, &mut rng);
    assert_eq!(small_talk.mode, Mode::SelfDisclosure);
}

#[test]
fn test_hinted_generation_rules() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let state = DialogueState::new();
    let mut rng = StdRng::seed_from_u64(3);

    let compliment = selector.select(&classifier.classify("너도 대단해?"), &state, &mut rng);
    assert_eq!(compliment.mode, Mode::ShortEmpathy);
    assert_eq!(compliment.hint, DirectiveHint::HumbleReturnCompliment);

    let thanks = selector.select(&classifier.classify("고마워?"), &state, &mut rng);
    assert_eq!(thanks.mode, Mode::Empathy);
    assert_eq!(thanks.hint, DirectiveHint::ExplainGratitude);
    assert!(thanks.canned.is_none());
}

#[test]
fn test_fourth_turn_is_forced_question() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let facts = classifier.classify(MEDIUM);

    let three_free = state_after(&[Mode::Empathy, Mode::Reflect, Mode::ShortEmpathy]);
    assert_eq!(three_free.question_gap(), 4);

    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let selection = selector.select(&facts, &three_free, &mut rng);
        assert_eq!(selection.mode, Mode::Ask);
        assert_eq!(selection.reason, SelectionReason::ForcedQuestion);
    }

    // One turn earlier the draw is still free.
    let two_free = state_after(&[Mode::Empathy, Mode::Reflect]);
    assert!(selector.shortcut(&facts, &two_free).is_none());
}

#[test]
fn test_early_forced_question_is_empathy_ask() {
    let config = EngineConfig {
        force_question_every: 2,
        ..EngineConfig::default()
    };
    let selector = ModeSelector::new(&config);
    let facts = PatternClassifier::new(&config).classify(MEDIUM);

    let state = state_after(&[Mode::Empathy]);
    let selection = selector.shortcut(&facts, &state).expect("cadence should fire");
    assert_eq!(selection.mode, Mode::EmpathyAsk);
}

#[test]
fn test_cadence_skips_short_long_and_distressed() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let overdue = state_after(&[Mode::Empathy; 5]);

    let long = "오늘은 아침부터 정신이 없었는데 지하철도 놓치고 회의도 밀리고 점심도 제대로 못 먹고 오후 내내 보고서만 붙잡고 있다가 겨우 퇴근해서 이제야 집에 도착했는데 저녁은 또 뭘 먹어야 할지 진짜 모르겠다";
    for text in ["오늘 진짜 힘들었어", "그냥 그래", long] {
        let facts = classifier.classify(text);
        if let Some(selection) = selector.shortcut(&facts, &overdue) {
            assert_ne!(selection.reason, SelectionReason::ForcedQuestion, "{text}");
        }
    }
}

#[test]
fn test_question_window_holds_across_seeds() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let facts = classifier.classify(MEDIUM);
    let every = EngineConfig::default().force_question_every as usize;

    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = DialogueState::new();
        let mut modes = Vec::new();

        for _ in 0..24 {
            let selection = selector.select(&facts, &state, &mut rng);
            state.reduce(StateDelta::TurnCompleted { mode: selection.mode });
            modes.push(selection.mode);
        }

        for window in modes.windows(every) {
            assert!(
                window.iter().any(|m| m.is_asking()),
                "seed {seed}: window without a question: {window:?}"
            );
        }
    }
}

#[test]
fn test_real_question_override_zeroes_asks() {
    let selector = ModeSelector::default();
    let facts = UtteranceFacts {
        real_question: true,
        has_interrogative: true,
        has_question_mark: true,
        char_len: 10,
        ..UtteranceFacts::default()
    };

    let table = selector.weight_table(&facts, &DialogueState::new());
    assert_eq!(table.get(Mode::Ask), 0.0);
    assert_eq!(table.get(Mode::EmpathyAsk), 0.0);
    assert!(approx(table.get(Mode::Empathy), 0.60));
    assert!(approx(table.get(Mode::ShortEmpathy), 0.30));
    assert!(approx(table.get(Mode::Reflect), 0.10));

    for seed in 0..64 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert!(!table.sample(&mut rng).is_asking());
    }
}

#[test]
fn test_repeat_question_damping() {
    let selector = ModeSelector::default();
    let facts = UtteranceFacts {
        char_len: 15,
        ..UtteranceFacts::default()
    };

    let late = state_after(&[Mode::Empathy, Mode::Empathy, Mode::Ask]);
    let table = selector.weight_table(&facts, &late);
    assert!(approx(table.get(Mode::Ask), 0.15 * 0.3));
    assert!(approx(table.get(Mode::Empathy), 0.45));

    let fresh = selector.weight_table(&facts, &DialogueState::new());
    assert!(approx(fresh.get(Mode::Ask), 0.15 * 0.5));
    assert!(approx(fresh.get(Mode::Reflect), 0.20));
}

#[test]
fn test_weight_floor_keeps_modes_reachable() {
    let mut table = WeightTable::base();
    table.set(Mode::Reflect, 0.0);
    table.clamp_min(0.01);
    assert!(approx(table.get(Mode::Reflect), 0.01));
}

#[test]
fn test_sampling_follows_weights() {
    let mut table = WeightTable::base();
    for mode in [Mode::ShortEmpathy, Mode::Empathy, Mode::Ask, Mode::EmpathyAsk] {
        table.set(mode, 0.0);
    }
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        assert_eq!(table.sample(&mut rng), Mode::Reflect);
    }
}

#[test]
fn test_everyday_sentences_do_not_trigger_safety_lock() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let state = state_after(&[]);

    for text in ["내 예상이 맞았어", "시험 답 맞았어", "회사 때려치울까"] {
        let facts = classifier.classify(text);
        assert!(!facts.safety_sensitive, "{text}");
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selection = selector.select(&facts, &state, &mut rng);
            assert_ne!(selection.reason, SelectionReason::Safety, "{text}");
            assert_ne!(selection.hint, DirectiveHint::SafetyComfort, "{text}");
        }
    }
}

#[test]
fn test_one_word_question_is_not_acknowledged() {
    let classifier = PatternClassifier::default();
    let selector = ModeSelector::default();
    let state = state_after(&[Mode::Empathy]);

    for text in ["왜?", "뭐?"] {
        let facts = classifier.classify(text);
        assert!(facts.real_question, "{text}");
        let mut rng = StdRng::seed_from_u64(3);
        let selection = selector.select(&facts, &state, &mut rng);
        assert_ne!(selection.mode, Mode::SimpleAck, "{text}");
        assert!(selection.canned.is_none(), "{text}");
    }
}
