use regex::Regex;
use stepwise_patterns::{
    SpecificityScore, compile_regex_from_pattern, extract_captured_values, placeholder_names,
};

use super::{ParserError, StepParser};
use crate::StepArgs;

/// Matches brace patterns such as `I have {count:u32} {fruit}`.
///
/// Untyped placeholders capture one whitespace-free token, possibly empty.
/// Typed placeholders narrow the capture (`u*`, `i*`, `f32`/`f64`) or widen it
/// (`text`). The whole line must match.
#[derive(Debug, Clone)]
pub struct PatternParser {
    pattern: String,
    regex: Regex,
    names: Vec<String>,
    specificity: SpecificityScore,
}

impl PatternParser {
    /// Compile `pattern`.
    ///
    /// # Errors
    /// Returns [`ParserError::Pattern`] for malformed or duplicated
    /// placeholders.
    pub fn new(pattern: &str) -> Result<Self, ParserError> {
        let wrap = |source| ParserError::Pattern {
            source_text: pattern.to_owned(),
            source,
        };
        Ok(Self {
            regex: compile_regex_from_pattern(pattern).map_err(wrap)?,
            names: placeholder_names(pattern).map_err(wrap)?,
            specificity: SpecificityScore::calculate(pattern).map_err(wrap)?,
            pattern: pattern.to_owned(),
        })
    }

    /// Placeholder names in pattern order.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.names
    }
}

impl StepParser for PatternParser {
    fn name(&self) -> &str {
        &self.pattern
    }

    fn parse_arguments(&self, text: &str) -> Option<StepArgs> {
        let values = extract_captured_values(&self.regex, text)?;
        let mut args = StepArgs::new();
        for (name, value) in self.names.iter().zip(values) {
            args.push(name.as_str(), value);
        }
        Some(args)
    }

    fn is_matching(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    fn specificity(&self) -> SpecificityScore {
        self.specificity
    }
}
