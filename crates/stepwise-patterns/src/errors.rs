//! Errors raised while turning step patterns into regular expressions.

use std::fmt;
use thiserror::Error;

/// Location and reason for a malformed placeholder.
///
/// # Examples
/// ```
/// use stepwise_patterns::PlaceholderErrorInfo;
/// let info = PlaceholderErrorInfo::new("invalid placeholder", 3, Some("value".into()));
/// assert_eq!(info.placeholder.as_deref(), Some("value"));
/// assert_eq!(info.position, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderErrorInfo {
    /// Short reason for the failure.
    pub message: &'static str,
    /// Zero-based byte offset into the pattern.
    pub position: usize,
    /// Placeholder name, when the parser got far enough to read it.
    pub placeholder: Option<String>,
}

impl PlaceholderErrorInfo {
    /// Describe a placeholder failure.
    #[must_use]
    pub const fn new(message: &'static str, position: usize, placeholder: Option<String>) -> Self {
        Self {
            message,
            position,
            placeholder,
        }
    }
}

impl fmt::Display for PlaceholderErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)?;
        if let Some(name) = &self.placeholder {
            write!(f, " for placeholder `{name}`")?;
        }
        write!(f, " at byte {} (zero-based)", self.position)
    }
}

/// Errors surfaced while compiling a step pattern.
///
/// # Examples
/// ```
/// use stepwise_patterns::{PatternError, PlaceholderErrorInfo};
/// let info = PlaceholderErrorInfo::new("invalid", 2, Some("count".into()));
/// let err = PatternError::Placeholder(info.clone());
/// assert_eq!(err.to_string(), info.to_string());
/// ```
#[derive(Debug, Error)]
pub enum PatternError {
    /// A placeholder is malformed, unbalanced or repeated.
    #[error("{0}")]
    Placeholder(PlaceholderErrorInfo),
    /// The generated regular expression was rejected by `regex`.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

pub(crate) fn placeholder_error(
    message: &'static str,
    position: usize,
    placeholder: Option<String>,
) -> PatternError {
    PatternError::Placeholder(PlaceholderErrorInfo::new(message, position, placeholder))
}
