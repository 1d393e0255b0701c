pub mod selector;
pub mod types;

pub use selector::{ModeSelector, WeightTable};
pub use types::*;
