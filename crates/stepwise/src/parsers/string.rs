use stepwise_patterns::SpecificityScore;

use super::StepParser;
use crate::StepArgs;

/// Matches a step line only when it equals the trigger exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringParser {
    text: String,
}

impl StringParser {
    /// Parser for exactly `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl StepParser for StringParser {
    fn name(&self) -> &str {
        &self.text
    }

    fn parse_arguments(&self, text: &str) -> Option<StepArgs> {
        (text == self.text).then(StepArgs::new)
    }

    fn specificity(&self) -> SpecificityScore {
        SpecificityScore::literal(&self.text)
    }
}
