//! Turn-level instrumentation.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (classifier, selector, sanitizer).
//! It exists solely for observability and verification.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (utterances, replies, prompts).
//! Only modes, reasons, routes, counters and durations are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{BackendFailureKind, TelemetryEvent};
pub use metrics::{compute_snapshot, TelemetrySnapshot};
pub use recorder::TelemetryRecorder;
