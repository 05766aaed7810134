//! Errors raised inside step bodies and by the runtime injector.

use std::fmt::Display;
use thiserror::Error;

use crate::naming::RESERVED_PREFIXES;

/// Failure reported by a step wrapper.
///
/// Wrappers generated by the step attributes produce these when a fixture or
/// argument cannot be bound, when the step body returns `Err`, or when it
/// panics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StepError {
    /// No value is bound under the fixture name.
    #[error("missing fixture '{name}' of type {ty}")]
    MissingFixture {
        /// Fixture name.
        name: String,
        /// Requested Rust type.
        ty: &'static str,
    },
    /// A value is bound under the name but has another type.
    #[error("fixture '{name}' is not of type {expected}")]
    FixtureType {
        /// Fixture name.
        name: String,
        /// Requested Rust type.
        expected: &'static str,
    },
    /// The parser did not produce the named argument.
    #[error("missing step argument '{name}'")]
    MissingArgument {
        /// Argument name.
        name: String,
    },
    /// The raw argument text could not be parsed.
    #[error("invalid value '{raw}' for step argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Text captured from the step line.
        raw: String,
        /// Parser error message.
        message: String,
    },
    /// A converter produced a value of another type.
    #[error("step argument '{name}' is not of type {expected}")]
    ArgumentType {
        /// Argument name.
        name: String,
        /// Requested Rust type.
        expected: &'static str,
    },
    /// The step body returned an error.
    #[error("{message}")]
    Failed {
        /// Rendered error.
        message: String,
    },
    /// The step body panicked.
    #[error("step panicked: {message}")]
    Panicked {
        /// Rendered panic payload.
        message: String,
    },
}

impl StepError {
    /// Wrap an error returned by a step body.
    ///
    /// ```
    /// use stepwise::StepError;
    /// let err = StepError::failed("disk full");
    /// assert_eq!(err.to_string(), "disk full");
    /// ```
    pub fn failed(err: impl Display) -> Self {
        Self::Failed {
            message: err.to_string(),
        }
    }
}

/// Rejected [`StepContext::inject`](crate::StepContext::inject) call.
///
/// Validation happens before any state changes, so a rejected injection
/// leaves the context untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InjectionError {
    /// Names must be non-empty.
    #[error("cannot inject a fixture with an empty name")]
    EmptyName,
    /// The name collides with the namespace used for step definitions.
    #[error("fixture name '{name}' uses a reserved prefix ({})", RESERVED_PREFIXES.join(", "))]
    ReservedName {
        /// Offending name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fixture_names_type() {
        let err = StepError::MissingFixture {
            name: "db".into(),
            ty: "u32",
        };
        assert_eq!(err.to_string(), "missing fixture 'db' of type u32");
    }

    #[test]
    fn reserved_name_lists_prefixes() {
        let err = InjectionError::ReservedName {
            name: "stepwise_stepdef_given_x".into(),
        };
        let message = err.to_string();
        assert!(message.contains("stepwise_stepdef"));
        assert!(message.contains("stepwise_stepimpl"));
    }
}
