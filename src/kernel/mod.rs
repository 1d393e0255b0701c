pub mod event;
pub mod intent;
pub mod mode;
pub mod pacing;
pub mod reactor;
pub mod speech;
pub mod state;
pub mod telemetry;
pub mod time;
