//! Parse a single `{name}` or `{name:hint}` placeholder.

use crate::errors::{PatternError, placeholder_error};

const INVALID: &str = "invalid placeholder in step pattern";
const UNCLOSED: &str = "missing closing '}' for placeholder";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placeholder {
    pub name: String,
    pub hint: Option<String>,
    /// Byte offset of the opening brace.
    pub start: usize,
    /// Byte offset one past the closing brace.
    pub end: usize,
}

/// Parse the placeholder whose opening brace sits at `start`.
pub(crate) fn parse_placeholder(pattern: &str, start: usize) -> Result<Placeholder, PatternError> {
    let body = pattern.get(start + 1..).unwrap_or_default();
    let name_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    let (name, rest) = body.split_at_checked(name_len).unwrap_or((body, ""));
    let name = name.to_owned();
    let name_end = start + 1 + name_len;

    if rest.is_empty() {
        return Err(placeholder_error(UNCLOSED, start, Some(name)));
    }
    if rest.starts_with('}') {
        return Ok(Placeholder {
            name,
            hint: None,
            start,
            end: name_end + 1,
        });
    }
    let Some(hint_src) = rest.strip_prefix(':') else {
        return Err(placeholder_error(INVALID, start, Some(name)));
    };
    let Some((hint, _)) = hint_src.split_once('}') else {
        return Err(placeholder_error(UNCLOSED, start, Some(name)));
    };
    if hint.is_empty() || hint.contains(|c: char| c.is_whitespace() || c == '{') {
        return Err(placeholder_error(INVALID, start, Some(name)));
    }
    Ok(Placeholder {
        end: name_end + 1 + hint.len() + 1,
        hint: Some(hint.to_owned()),
        name,
        start,
    })
}
