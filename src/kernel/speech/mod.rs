pub mod catalog;
pub mod directive;
pub mod sanitizer;

pub use catalog::WorryCatalog;
pub use directive::{DirectiveBuilder, QuestionRule, StyleDirective};
pub use sanitizer::{sanitize, ReplySanitizer, Sanitized};
