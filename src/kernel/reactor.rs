use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::event::{ConversationTurn, ReplyRoute, Role, TurnOutcome, Utterance};
use super::intent::PatternClassifier;
use super::mode::types::{CannedKind, Mode, Selection};
use super::mode::ModeSelector;
use super::pacing::PacingSimulator;
use super::speech::catalog::{self, PERSONA_INSTRUCTION};
use super::speech::{DirectiveBuilder, ReplySanitizer, WorryCatalog};
use super::state::{DialogueState, InMemorySessionStore, SessionStore, StateDelta};
use super::telemetry::{BackendFailureKind, TelemetryEvent, TelemetryRecorder, TelemetrySnapshot};
use super::time::{self, Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{BackendError, ConfigError};
use crate::services::llm::{ChatMessage, GenerationBackend};

/// What the pure step decided for one turn. Only `Generate` needs the backend.
#[derive(Debug, Clone)]
pub enum TurnPlan {
    Reply {
        selection: Selection,
        text: String,
    },
    Generate {
        selection: Selection,
        messages: Vec<ChatMessage>,
    },
}

impl TurnPlan {
    pub fn selection(&self) -> Selection {
        match self {
            TurnPlan::Reply { selection, .. } | TurnPlan::Generate { selection, .. } => *selection,
        }
    }
}

/// One conversation session: classification, mode selection, generation,
/// sanitizing, pacing and the state update, one turn at a time.
pub struct Reactor {
    classifier: PatternClassifier,
    selector: ModeSelector,
    directives: DirectiveBuilder,
    sanitizer: ReplySanitizer,
    pacing: PacingSimulator,
    store: Box<dyn SessionStore>,
    backend: Box<dyn GenerationBackend>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    telemetry: TelemetryRecorder,
}

impl Reactor {
    /// Rejects configs that would break pacing or cadence mid-session.
    pub fn new(
        config: &EngineConfig,
        backend: Box<dyn GenerationBackend>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            classifier: PatternClassifier::new(config),
            selector: ModeSelector::new(config),
            directives: DirectiveBuilder::new(config.exemplars_per_directive, WorryCatalog::standard()),
            sanitizer: ReplySanitizer::new(config),
            pacing: PacingSimulator::new(config.pacing.clone()),
            store: Box::new(InMemorySessionStore::new()),
            backend,
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
            telemetry: TelemetryRecorder::new(),
        })
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_store(mut self, store: Box<dyn SessionStore>) -> Self {
        self.store = store;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.store.session_id()
    }

    pub fn state(&self) -> &DialogueState {
        self.store.state()
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.store.log().turns()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn telemetry_events(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Appends the time-of-day greeting. Does not count as a dialogue turn.
    pub fn open_session(&mut self) -> ConversationTurn {
        let line = time::greeting(&self.clock.now());
        let turn = ConversationTurn::agent(line);
        self.store.append(turn.clone());
        self.telemetry.record(TelemetryEvent::SessionOpened);
        info!(session = %self.store.session_id(), "session opened");
        turn
    }

    /// Pure step: records the user turn and decides the reply route.
    /// MUST NOT await I/O. The only mutation is the log append.
    pub fn plan_turn(&mut self, utterance: &Utterance) -> TurnPlan {
        self.store.append(ConversationTurn::user(utterance.as_str()));

        let facts = self.classifier.classify(utterance.as_str());
        let state = self.store.state().clone();
        let selection = self.selector.select(&facts, &state, &mut self.rng);

        self.telemetry.record(TelemetryEvent::QuestionGap {
            gap: state.question_gap(),
        });
        self.telemetry.record(TelemetryEvent::ModeSelected {
            turn_index: state.turn_index(),
            mode: selection.mode,
            reason: selection.reason,
        });
        info!(
            turn = state.turn_index(),
            user_chars = utterance.char_len(),
            mode = %selection.mode,
            reason = ?selection.reason,
            "mode selected"
        );

        if let Some(kind) = selection.canned {
            let text = self.canned_text(kind);
            return TurnPlan::Reply { selection, text };
        }

        let messages = self.build_messages(&selection);
        TurnPlan::Generate { selection, messages }
    }

    fn canned_text(&mut self, kind: CannedKind) -> String {
        match kind {
            CannedKind::TimeOfDay => time::time_reply(&self.clock.now()),
            other => catalog::pick_canned(other, &mut self.rng)
                .unwrap_or_else(|| catalog::backend_fallback(&mut self.rng))
                .to_string(),
        }
    }

    /// Persona, directive and time instructions, then the whole log.
    /// The log already ends with the current user turn.
    fn build_messages(&mut self, selection: &Selection) -> Vec<ChatMessage> {
        let directive = self.directives.build(selection.mode, selection.hint, &mut self.rng);
        debug!(?directive, "style directive built");

        let mut messages = vec![
            ChatMessage::system(PERSONA_INSTRUCTION),
            ChatMessage::system(directive.render()),
            ChatMessage::system(time::time_context_line(&self.clock.now())),
        ];
        messages.extend(self.store.log().turns().iter().map(|turn| match turn.role {
            Role::User => ChatMessage::user(turn.content.clone()),
            Role::Agent => ChatMessage::assistant(turn.content.clone()),
        }));
        messages
    }

    /// Turns backend output (or its failure) into final reply text.
    pub fn resolve_generation(
        &mut self,
        mode: Mode,
        result: Result<String, BackendError>,
    ) -> (String, ReplyRoute) {
        match result {
            Ok(raw) => {
                let sanitized = self.sanitizer.sanitize_report(&raw, mode);
                if sanitized.fell_back {
                    warn!(%mode, raw_chars = raw.chars().count(), "degenerate reply replaced");
                    self.telemetry.record(TelemetryEvent::SanitizerFallback { mode });
                }
                (sanitized.text, ReplyRoute::Generated)
            }
            Err(err) => {
                warn!(%mode, error = %err, "generation backend failed, using fallback");
                self.telemetry.record(TelemetryEvent::BackendFailed {
                    kind: BackendFailureKind::from(&err),
                });
                let text = catalog::backend_fallback(&mut self.rng).to_string();
                (text, ReplyRoute::BackendFallback)
            }
        }
    }

    /// Computes pacing, applies the state delta and appends the agent turn.
    /// Runs on every path, fallback included.
    pub fn complete_turn(
        &mut self,
        utterance: &Utterance,
        selection: Selection,
        text: String,
        route: ReplyRoute,
    ) -> TurnOutcome {
        let delay = self
            .pacing
            .delay(utterance.char_len(), text.chars().count(), &mut self.rng);

        self.store.apply(StateDelta::TurnCompleted {
            mode: selection.mode,
        });
        let reply = ConversationTurn::agent(text);
        self.store.append(reply.clone());

        let delay_ms = delay.as_millis() as u64;
        self.telemetry.record(TelemetryEvent::ReplyProduced {
            mode: selection.mode,
            route,
            delay_ms,
        });
        info!(
            mode = %selection.mode,
            route = ?route,
            reply_chars = reply.content.chars().count(),
            delay_ms,
            version = self.store.state().version(),
            "turn completed"
        );

        TurnOutcome {
            reply,
            mode: selection.mode,
            reason: selection.reason,
            route,
            delay,
        }
    }

    /// Async driver for one turn. Never fails: backend errors take the fallback path.
    pub async fn handle_turn(&mut self, text: &str) -> TurnOutcome {
        let utterance = Utterance::new(text);

        match self.plan_turn(&utterance) {
            TurnPlan::Reply { selection, text } => {
                self.complete_turn(&utterance, selection, text, ReplyRoute::Canned)
            }
            TurnPlan::Generate { selection, messages } => {
                let result = self.backend.generate(&messages).await;
                let (text, route) = self.resolve_generation(selection.mode, result);
                self.complete_turn(&utterance, selection, text, route)
            }
        }
    }
}

impl std::fmt::Debug for Reactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactor")
            .field("session", &self.store.session_id())
            .field("state", self.store.state())
            .finish_non_exhaustive()
    }
}
