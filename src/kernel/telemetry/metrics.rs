use std::collections::{BTreeMap, VecDeque};

use super::event::TelemetryEvent;
use crate::kernel::event::ReplyRoute;
use crate::kernel::mode::types::SelectionReason;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub turns: u64,
    pub mode_counts: BTreeMap<&'static str, u64>,
    pub route_stats: RouteStats,
    pub question_stats: QuestionStats,
    pub pacing_stats: PacingStats,
}

#[derive(Debug, Clone, Default)]
pub struct RouteStats {
    pub canned: u64,
    pub generated: u64,
    pub backend_fallbacks: u64,
    pub backend_failures: u64,
    pub sanitizer_fallbacks: u64,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionStats {
    pub questions_asked: u64,
    pub forced_questions: u64,
    pub max_gap: u32,
}

#[derive(Debug, Clone, Default)]
pub struct PacingStats {
    pub total_delay_ms: u64,
    pub avg_delay_ms: f64,
    pub max_delay_ms: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut replies = 0u64;

    for event in events {
        match event {
            TelemetryEvent::ModeSelected { mode, reason, .. } => {
                snap.turns += 1;
                *snap.mode_counts.entry(mode.as_str()).or_insert(0) += 1;
                if mode.is_asking() {
                    snap.question_stats.questions_asked += 1;
                }
                if *reason == SelectionReason::ForcedQuestion {
                    snap.question_stats.forced_questions += 1;
                }
            }
            TelemetryEvent::QuestionGap { gap } => {
                snap.question_stats.max_gap = snap.question_stats.max_gap.max(*gap);
            }
            TelemetryEvent::ReplyProduced { route, delay_ms, .. } => {
                replies += 1;
                match route {
                    ReplyRoute::Canned => snap.route_stats.canned += 1,
                    ReplyRoute::Generated => snap.route_stats.generated += 1,
                    ReplyRoute::BackendFallback => snap.route_stats.backend_fallbacks += 1,
                }
                snap.pacing_stats.total_delay_ms += delay_ms;
                snap.pacing_stats.max_delay_ms = snap.pacing_stats.max_delay_ms.max(*delay_ms);
            }
            TelemetryEvent::BackendFailed { .. } => snap.route_stats.backend_failures += 1,
            TelemetryEvent::SanitizerFallback { .. } => snap.route_stats.sanitizer_fallbacks += 1,
            TelemetryEvent::SessionOpened => {}
        }
    }

    if replies > 0 {
        snap.pacing_stats.avg_delay_ms = snap.pacing_stats.total_delay_ms as f64 / replies as f64;
    }

    snap
}
