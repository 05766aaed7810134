//! Step-pattern lexing and compilation.

mod compiler;
pub(crate) mod lexer;
mod placeholder;

use crate::errors::PatternError;
use regex::Regex;

pub use compiler::build_regex_from_pattern;

use compiler::ensure_unique_names;
use lexer::{Token, lex_pattern};

/// Build and compile the regular expression for a step pattern.
///
/// # Errors
/// Returns [`PatternError`] when the pattern is malformed or the generated
/// source is rejected by `regex`.
pub fn compile_regex_from_pattern(pat: &str) -> Result<Regex, PatternError> {
    let source = build_regex_from_pattern(pat)?;
    Regex::new(&source).map_err(PatternError::from)
}

/// Placeholder names in the order they appear in `pat`.
///
/// The capture groups produced by [`compile_regex_from_pattern`] line up
/// with this list one to one.
///
/// # Errors
/// Returns [`PatternError`] when the pattern is malformed or repeats a name.
///
/// # Examples
/// ```
/// # use stepwise_patterns::placeholder_names;
/// let names = placeholder_names("move {from} to {to:u8}")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(names, ["from", "to"]);
/// ```
pub fn placeholder_names(pat: &str) -> Result<Vec<String>, PatternError> {
    let tokens = lex_pattern(pat)?;
    ensure_unique_names(&tokens)?;
    Ok(tokens
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder(placeholder) => Some(placeholder.name),
            _ => None,
        })
        .collect())
}
