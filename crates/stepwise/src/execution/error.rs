//! Errors raised while resolving and running step lines.

use stepwise_patterns::{StepKeyword, UnsupportedStepType};
use thiserror::Error;

use crate::{InjectionError, StepError};

/// Failure to run a step line.
///
/// Each variant other than [`StepNotFound`](Self::StepNotFound) names the
/// definition involved as `scope::id`.
///
/// # Examples
///
/// ```
/// use stepwise::execution::ExecutionError;
/// use stepwise::StepKeyword;
///
/// let err = ExecutionError::StepNotFound {
///     keyword: StepKeyword::Given,
///     text: "an unknown step".into(),
/// };
/// assert_eq!(err.to_string(), "no step definition matches Given 'an unknown step'");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// No visible definition accepts the line.
    #[error("no step definition matches {keyword} '{text}'")]
    StepNotFound {
        /// Resolved keyword.
        keyword: StepKeyword,
        /// Step text.
        text: String,
    },
    /// A parsed Gherkin step has a type with no keyword counterpart.
    #[error("cannot run '{text}': {source}")]
    UnsupportedKeyword {
        /// Step text.
        text: String,
        /// Conversion error.
        #[source]
        source: UnsupportedStepType,
    },
    /// A converter rejected an argument. Conversions are not retried.
    #[error("step '{step}' could not convert argument '{argument}' from '{raw}': {message}")]
    ConversionFailed {
        /// Definition.
        step: String,
        /// Argument name.
        argument: String,
        /// Captured text.
        raw: String,
        /// Converter message.
        message: String,
    },
    /// The step implementation failed.
    #[error("step '{step}' failed on '{text}': {source}")]
    HandlerFailed {
        /// Definition.
        step: String,
        /// Step text.
        text: String,
        /// Failure reported by the wrapper.
        #[source]
        source: StepError,
    },
    /// The return value could not be published as a fixture.
    #[error("step '{step}' could not publish its target fixture: {source}")]
    InjectionFailed {
        /// Definition.
        step: String,
        /// Injector error.
        #[source]
        source: InjectionError,
    },
    /// The definition declares a target fixture but returned no value.
    #[error("step '{step}' declares target fixture '{target}' but returned no value")]
    TargetNotProduced {
        /// Definition.
        step: String,
        /// Declared target fixture.
        target: String,
    },
}

impl ExecutionError {
    /// Whether the line simply had no matching definition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StepNotFound { .. })
    }
}
