//! Turn lexed tokens into an anchored regular-expression source.

use crate::errors::{PatternError, placeholder_error};
use crate::hint::get_type_pattern;

use super::lexer::{Token, lex_pattern};

/// Build the anchored regex source for a step pattern.
///
/// Each placeholder becomes one unnamed capture group, in pattern order.
/// Literal text is escaped; stray braces must balance.
///
/// # Errors
/// Returns [`PatternError`] for malformed, unbalanced or duplicated
/// placeholders.
///
/// # Examples
/// ```
/// # use stepwise_patterns::build_regex_from_pattern;
/// let source = build_regex_from_pattern("I have {count:u32} cukes")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(source, r"^I have (\d+) cukes$");
/// ```
pub fn build_regex_from_pattern(pat: &str) -> Result<String, PatternError> {
    let tokens = lex_pattern(pat)?;
    ensure_unique_names(&tokens)?;

    let mut regex = String::with_capacity(pat.len().saturating_mul(2) + 2);
    regex.push('^');
    let mut stray_depth = 0usize;

    for token in tokens {
        match token {
            Token::Literal(text) => regex.push_str(&regex::escape(&text)),
            Token::Placeholder(placeholder) => {
                regex.push('(');
                regex.push_str(get_type_pattern(placeholder.hint.as_deref()));
                regex.push(')');
            }
            Token::OpenBrace { .. } => {
                stray_depth = stray_depth.saturating_add(1);
                regex.push_str(r"\{");
            }
            Token::CloseBrace { index } => {
                stray_depth = stray_depth.checked_sub(1).ok_or_else(|| {
                    placeholder_error("unmatched closing brace '}' in step pattern", index, None)
                })?;
                regex.push_str(r"\}");
            }
        }
    }

    if stray_depth != 0 {
        return Err(placeholder_error(
            "unbalanced braces in step pattern",
            pat.len(),
            None,
        ));
    }

    regex.push('$');
    Ok(regex)
}

pub(crate) fn ensure_unique_names(tokens: &[Token]) -> Result<(), PatternError> {
    let mut seen: Vec<&str> = Vec::new();
    for token in tokens {
        if let Token::Placeholder(placeholder) = token {
            if seen.contains(&placeholder.name.as_str()) {
                return Err(placeholder_error(
                    "duplicate placeholder name in step pattern",
                    placeholder.start,
                    Some(placeholder.name.clone()),
                ));
            }
            seen.push(&placeholder.name);
        }
    }
    Ok(())
}
