//! Step parsers: decide whether a step line matches a trigger and extract
//! its named arguments.
//!
//! Registrations store a [`ParserSpec`], which is `const`-constructible so it
//! can live inside an `inventory` record. The registry turns each spec into a
//! boxed [`StepParser`] once, when it is collected.

mod pattern;
mod re;
mod string;

use std::fmt;

use stepwise_patterns::{PatternError, SpecificityScore};
use thiserror::Error;

use crate::StepArgs;

pub use pattern::PatternParser;
pub use re::RegexParser;
pub use string::StringParser;

/// Contract every step parser satisfies.
///
/// Implementations must be pure: the same text always yields the same
/// result.
pub trait StepParser: fmt::Debug + Send + Sync {
    /// Identifying name, normally the trigger source. Used to derive the
    /// definition's registry identifier.
    fn name(&self) -> &str;

    /// Arguments extracted from `text`, or `None` when it does not match.
    fn parse_arguments(&self, text: &str) -> Option<StepArgs>;

    /// Whether `text` matches.
    fn is_matching(&self, text: &str) -> bool {
        self.parse_arguments(text).is_some()
    }

    /// Rank used by [`MatchPolicy::MostSpecific`](crate::config::MatchPolicy).
    fn specificity(&self) -> SpecificityScore {
        SpecificityScore::default()
    }
}

/// Failure to build a parser from its trigger.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParserError {
    /// Malformed brace pattern.
    #[error("invalid step pattern '{source_text}': {source}")]
    Pattern {
        /// Offending pattern.
        source_text: String,
        /// Underlying error.
        #[source]
        source: PatternError,
    },
    /// Rejected regular expression.
    #[error("invalid step regex '{source_text}': {source}")]
    Regex {
        /// Offending expression.
        source_text: String,
        /// Underlying error.
        #[source]
        source: regex::Error,
    },
    /// A custom parser constructor failed.
    #[error("{0}")]
    Custom(String),
}

/// Builds a custom parser when the registry is collected.
pub type ParserFactory = fn() -> Result<Box<dyn StepParser>, ParserError>;

/// Trigger of a step definition in a form that can be stored in a `static`.
///
/// # Examples
/// ```
/// use stepwise::parsers::{self, ParserSpec};
///
/// const EXACT: ParserSpec = parsers::string("I press enter");
/// const PATTERN: ParserSpec = parsers::parse("I type {text}");
///
/// let parser = PATTERN.build().expect("valid pattern");
/// let args = parser.parse_arguments("I type hello").expect("matches");
/// assert_eq!(args.raw("text"), Some("hello"));
/// assert!(EXACT.build().expect("valid").is_matching("I press enter"));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum ParserSpec {
    /// Exact string equality.
    String(&'static str),
    /// Brace pattern with `{name}` or `{name:hint}` placeholders.
    Parse(&'static str),
    /// Regular expression with named groups, matched against the whole line.
    Regex(&'static str),
    /// Any other parser.
    Custom(ParserFactory),
}

impl ParserSpec {
    /// Construct the parser.
    ///
    /// # Errors
    /// Returns [`ParserError`] when the pattern or expression is invalid or
    /// a custom factory fails.
    pub fn build(&self) -> Result<Box<dyn StepParser>, ParserError> {
        match *self {
            Self::String(text) => Ok(Box::new(StringParser::new(text))),
            Self::Parse(pattern) => Ok(Box::new(PatternParser::new(pattern)?)),
            Self::Regex(source) => Ok(Box::new(RegexParser::new(source)?)),
            Self::Custom(factory) => factory(),
        }
    }

    /// Trigger source text, when there is one.
    #[must_use]
    pub const fn source(&self) -> Option<&'static str> {
        match *self {
            Self::String(text) | Self::Parse(text) | Self::Regex(text) => Some(text),
            Self::Custom(_) => None,
        }
    }
}

impl From<&'static str> for ParserSpec {
    fn from(text: &'static str) -> Self {
        Self::String(text)
    }
}

/// Exact-match trigger.
#[must_use]
pub const fn string(text: &'static str) -> ParserSpec {
    ParserSpec::String(text)
}

/// Brace-pattern trigger, e.g. `parse("I have {count:u32} apples")`.
#[must_use]
pub const fn parse(pattern: &'static str) -> ParserSpec {
    ParserSpec::Parse(pattern)
}

/// Regular-expression trigger, e.g. `re(r"I have (?P<count>\d+) apples")`.
#[must_use]
pub const fn re(source: &'static str) -> ParserSpec {
    ParserSpec::Regex(source)
}

/// Trigger backed by a user-supplied parser.
#[must_use]
pub const fn custom(factory: ParserFactory) -> ParserSpec {
    ParserSpec::Custom(factory)
}
