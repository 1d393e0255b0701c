use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::TimeZone;
use chrono_tz::Asia::Seoul;
use jinwoo::config::EngineConfig;
use jinwoo::error::BackendError;
use jinwoo::kernel::event::{ReplyRoute, Role, Utterance};
use jinwoo::kernel::reactor::TurnPlan;
use jinwoo::kernel::mode::{CannedKind, Mode, SelectionReason};
use jinwoo::kernel::speech::catalog::{canned_replies, EMPATHY_FALLBACKS, PERSONA_INSTRUCTION};
use jinwoo::kernel::state::{ConversationLog, DialogueState, InMemorySessionStore, StateDelta};
use jinwoo::kernel::time::FixedClock;
use jinwoo::services::llm::{ChatMessage, ChatRole, GenerationBackend};
use jinwoo::Reactor;
use uuid::Uuid;

const MEDIUM: &str = "오늘 회사에서 회의가 길게 이어졌어";

/// Returns a fixed reply and keeps every request it saw.
#[derive(Clone)]
struct ScriptedBackend {
    reply: String,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl ScriptedBackend {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> Vec<ChatMessage> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.clone())
    }
}

struct FailingBackend;

#[async_trait]
impl GenerationBackend for FailingBackend {
    async fn generate(&self, _messages: &[ChatMessage]) -> Result<String, BackendError> {
        Err(BackendError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

fn clock_at(hour: u32, minute: u32) -> Box<FixedClock> {
    Box::new(FixedClock(Seoul.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()))
}

fn reactor_with(backend: impl GenerationBackend + 'static) -> Reactor {
    Reactor::new(&EngineConfig::default(), Box::new(backend))
        .unwrap()
        .with_seed(11)
        .with_clock(clock_at(14, 0))
}

#[tokio::test]
async fn test_calling_reply_skips_backend() {
    let backend = ScriptedBackend::new("이건 쓰이면 안 돼");
    let mut reactor = reactor_with(backend.clone());

    let outcome = reactor.handle_turn("친구야?").await;

    assert_eq!(outcome.mode, Mode::Reaction);
    assert_eq!(outcome.reason, SelectionReason::Calling);
    assert_eq!(outcome.route, ReplyRoute::Canned);
    assert!(canned_replies(CannedKind::Calling).contains(&outcome.reply.content.as_str()));
    assert_eq!(backend.calls(), 0);
    assert_eq!(reactor.state().turn_index(), 1);
}

#[tokio::test]
async fn test_short_positive_is_simple_ack() {
    let backend = ScriptedBackend::new("unused");
    let mut reactor = reactor_with(backend.clone());

    let outcome = reactor.handle_turn("응").await;

    assert_eq!(outcome.mode, Mode::SimpleAck);
    assert!(canned_replies(CannedKind::Ack).contains(&outcome.reply.content.as_str()));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_time_query_reads_clock() {
    let backend = ScriptedBackend::new("unused");
    let mut reactor = reactor_with(backend.clone());

    let outcome = reactor.handle_turn("지금 몇 시야?").await;
    assert_eq!(outcome.reply.content, "지금 14시야");
    assert_eq!(outcome.mode, Mode::Reaction);

    let mut reactor = reactor_with(backend.clone()).with_clock(clock_at(14, 5));
    let outcome = reactor.handle_turn("지금 몇 시야?").await;
    assert_eq!(outcome.reply.content, "지금 14시 5분이야");

    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_safety_then_short_positive() {
    let backend = ScriptedBackend::new("많이 힘들었겠다. 천천히 얘기해줘.");
    let mut reactor = reactor_with(backend.clone());

    let first = reactor.handle_turn("요즘 너무 우울해").await;
    assert_eq!(first.mode, Mode::Empathy);
    assert_eq!(first.route, ReplyRoute::Generated);
    assert_eq!(first.reply.content, "많이 힘들었겠다.");
    assert_eq!(reactor.state().last_question_turn_index(), None);

    let second = reactor.handle_turn("응").await;
    assert_eq!(second.mode, Mode::SimpleAck);
    assert_eq!(reactor.state().last_question_turn_index(), None);
    assert_eq!(reactor.state().turn_index(), 2);
    assert_eq!(reactor.state().last_mode(), Some(Mode::SimpleAck));

    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn test_backend_failure_falls_back_and_still_updates_state() {
    let mut reactor = reactor_with(FailingBackend);

    let outcome = reactor.handle_turn(MEDIUM).await;

    assert_eq!(outcome.route, ReplyRoute::BackendFallback);
    assert!(EMPATHY_FALLBACKS.contains(&outcome.reply.content.as_str()));
    assert_eq!(reactor.state().turn_index(), 1);
    assert_eq!(reactor.state().last_mode(), Some(outcome.mode));

    let history = reactor.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].role, Role::Agent);
    assert_eq!(history[1].content, outcome.reply.content);

    let snapshot = reactor.telemetry();
    assert_eq!(snapshot.route_stats.backend_failures, 1);
    assert_eq!(snapshot.route_stats.backend_fallbacks, 1);
}

#[tokio::test]
async fn test_request_order() {
    let backend = ScriptedBackend::new("그랬구나");
    let mut reactor = reactor_with(backend.clone());

    let greeting = reactor.open_session();
    assert_eq!(greeting.content, "오후네~ 오늘 어때?");
    reactor.handle_turn(MEDIUM).await;

    let request = backend.last_request();
    assert_eq!(request.len(), 5);
    assert_eq!(request[0].role, ChatRole::System);
    assert_eq!(request[0].content, PERSONA_INSTRUCTION);
    assert_eq!(request[1].role, ChatRole::System);
    assert!(request[1].content.starts_with("[이번 답변 방식: "));
    assert_eq!(request[2].content, "[시스템] 현재: 2024년 5월 1일 (수) 14시 0분");
    assert_eq!(request[3], ChatMessage::assistant("오후네~ 오늘 어때?"));
    assert_eq!(request[4], ChatMessage::user(MEDIUM));
}

#[tokio::test]
async fn test_greeting_does_not_count_as_turn() {
    let mut reactor = reactor_with(ScriptedBackend::new("unused"));
    reactor.open_session();
    assert_eq!(reactor.state(), &DialogueState::new());
    assert_eq!(reactor.history().len(), 1);
}

#[tokio::test]
async fn test_question_cadence_over_a_session() {
    let backend = ScriptedBackend::new("그랬구나 그래서 어떻게 됐어?");
    let mut reactor = reactor_with(backend.clone());

    let mut modes = Vec::new();
    for _ in 0..12 {
        modes.push(reactor.handle_turn(MEDIUM).await.mode);
    }

    for window in modes.windows(4) {
        assert!(window.iter().any(|m| m.is_asking()), "{window:?}");
    }
    let snapshot = reactor.telemetry();
    assert_eq!(snapshot.turns, 12);
    assert!(snapshot.question_stats.max_gap <= 4);
}

#[tokio::test]
async fn test_asking_turns_carry_question_mark() {
    // The backend never asks anything; the sanitizer has to add it.
    let backend = ScriptedBackend::new("그랬구나.");
    let mut reactor = reactor_with(backend);

    let mut asked = 0;
    for _ in 0..8 {
        let outcome = reactor.handle_turn(MEDIUM).await;
        if outcome.mode.is_asking() {
            asked += 1;
            assert!(outcome.reply.content.contains('?'), "{}", outcome.reply.content);
        }
    }
    assert!(asked >= 2);
    assert!(reactor.state().last_question_turn_index().is_some());
}

#[tokio::test]
async fn test_degenerate_generation_is_replaced() {
    let backend = ScriptedBackend::new("죄송합니다.");
    let mut reactor = reactor_with(backend);

    let outcome = reactor.handle_turn(MEDIUM).await;
    assert_eq!(outcome.route, ReplyRoute::Generated);
    assert!(!outcome.reply.content.contains("죄송"));
    assert!(!outcome.reply.content.is_empty());
    assert_eq!(reactor.telemetry().route_stats.sanitizer_fallbacks, 1);
}

#[test]
fn test_fallback_counted_when_raw_already_holds_it() {
    let mut reactor = reactor_with(ScriptedBackend::new("unused"));

    let (text, route) = reactor.resolve_generation(Mode::Empathy, Ok("ㅋ.   그랬구나".to_string()));
    assert_eq!(text, "그랬구나");
    assert_eq!(route, ReplyRoute::Generated);
    assert_eq!(reactor.telemetry().route_stats.sanitizer_fallbacks, 1);

    reactor.resolve_generation(Mode::Empathy, Ok("그랬구나".to_string()));
    assert_eq!(reactor.telemetry().route_stats.sanitizer_fallbacks, 1);
}

#[test]
fn test_rejects_invalid_config() {
    let mut config = EngineConfig::default();
    config.pacing.min_delay_secs = 3.0;
    config.pacing.max_delay_secs = 1.0;
    assert!(Reactor::new(&config, Box::new(ScriptedBackend::new("unused"))).is_err());

    let mut config = EngineConfig::default();
    config.force_question_every = 0;
    assert!(Reactor::new(&config, Box::new(ScriptedBackend::new("unused"))).is_err());
}

#[tokio::test]
async fn test_resumes_restored_session() {
    let mut state = DialogueState::new();
    for mode in [Mode::Empathy, Mode::Reflect, Mode::ShortEmpathy] {
        state.reduce(StateDelta::TurnCompleted { mode });
    }
    let id = Uuid::new_v4();
    let store = InMemorySessionStore::restore(id, state, ConversationLog::new());

    let mut reactor = reactor_with(ScriptedBackend::new("그래서 어떻게 됐어?")).with_store(Box::new(store));
    assert_eq!(reactor.session_id(), id);

    let outcome = reactor.handle_turn(MEDIUM).await;
    assert_eq!(outcome.mode, Mode::Ask);
    assert_eq!(outcome.reason, SelectionReason::ForcedQuestion);
    assert_eq!(reactor.state().last_question_turn_index(), Some(3));
}

#[tokio::test]
async fn test_telemetry_never_carries_text() {
    let mut reactor = reactor_with(ScriptedBackend::new("그랬구나"));
    reactor.handle_turn(MEDIUM).await;
    reactor.handle_turn("친구야?").await;

    let dump = serde_json::to_string(&reactor.telemetry_events().events()).unwrap();
    assert!(!dump.contains("회의"));
    assert!(!dump.contains("친구"));
    assert!(!dump.contains("그랬구나"));
}

#[test]
fn test_plan_step_does_not_touch_state() {
    let mut reactor = reactor_with(ScriptedBackend::new("unused"));

    let plan = reactor.plan_turn(&Utterance::new("응"));
    assert!(matches!(plan, TurnPlan::Reply { .. }));
    assert_eq!(plan.selection().mode, Mode::SimpleAck);

    let plan = reactor.plan_turn(&Utterance::new(MEDIUM));
    match plan {
        TurnPlan::Generate { messages, .. } => {
            assert_eq!(messages.last(), Some(&ChatMessage::user(MEDIUM)));
        }
        other => panic!("expected generation, got {other:?}"),
    }

    // Only the log grew; no turn was completed.
    assert_eq!(reactor.state().turn_index(), 0);
    assert_eq!(reactor.history().len(), 2);
}
