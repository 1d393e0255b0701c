pub mod classifier;
pub mod lexicon;
pub mod types;

pub use classifier::PatternClassifier;
pub use types::{PositiveKind, UtteranceFacts};
