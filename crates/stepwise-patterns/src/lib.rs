//! Step-pattern parsing utilities shared by `stepwise` and `stepwise-macros`.
//!
//! The macros crate validates literal patterns while expanding a step
//! attribute; the runtime compiles the same patterns into parsers when the
//! step registry is collected. Both go through this crate so a pattern that
//! compiles at build time behaves identically at run time.

mod capture;
mod errors;
mod hint;
mod keyword;
mod pattern;
mod specificity;

pub use capture::extract_captured_values;
pub use errors::{PatternError, PlaceholderErrorInfo};
pub use hint::get_type_pattern;
pub use keyword::{StepKeyword, StepKeywordParseError, UnsupportedStepType};
pub use pattern::{build_regex_from_pattern, compile_regex_from_pattern, placeholder_names};
pub use specificity::SpecificityScore;
