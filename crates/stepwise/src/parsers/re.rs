use regex::Regex;

use super::{ParserError, StepParser};
use crate::StepArgs;

/// Matches a regular expression against the whole step line.
///
/// Named groups become arguments; unnamed groups are ignored, and named
/// groups that did not participate in the match are left out.
#[derive(Debug, Clone)]
pub struct RegexParser {
    source: String,
    regex: Regex,
}

impl RegexParser {
    /// Compile `source`, anchoring it at both ends.
    ///
    /// # Errors
    /// Returns [`ParserError::Regex`] when `regex` rejects the expression.
    pub fn new(source: &str) -> Result<Self, ParserError> {
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(|err| ParserError::Regex {
            source_text: source.to_owned(),
            source: err,
        })?;
        Ok(Self {
            source: source.to_owned(),
            regex,
        })
    }
}

impl StepParser for RegexParser {
    fn name(&self) -> &str {
        &self.source
    }

    fn parse_arguments(&self, text: &str) -> Option<StepArgs> {
        let captures = self.regex.captures(text)?;
        let mut args = StepArgs::new();
        for name in self.regex.capture_names().flatten() {
            if let Some(value) = captures.name(name) {
                args.push(name, value.as_str());
            }
        }
        Some(args)
    }

    fn is_matching(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(source: &str) -> RegexParser {
        RegexParser::new(source).unwrap_or_else(|err| panic!("{source}: {err}"))
    }

    #[test]
    fn requires_full_match() {
        let parser = parser(r"I have (?P<count>\d+) apples");
        assert!(parser.is_matching("I have 3 apples"));
        assert!(!parser.is_matching("I have 3 apples today"));
        assert!(!parser.is_matching("so I have 3 apples"));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let parser = parser("yes|no");
        assert!(parser.is_matching("no"));
        assert!(!parser.is_matching("yes and no"));
    }

    #[test]
    fn extracts_only_named_groups() {
        let args = parser(r"(?P<who>\w+) (eats|drinks) (?P<what>\w+)")
            .parse_arguments("cat eats fish")
            .unwrap_or_else(|| panic!("should match"));
        assert_eq!(args.names().collect::<Vec<_>>(), ["who", "what"]);
        assert_eq!(args.raw("what"), Some("fish"));
    }

    #[test]
    fn skips_groups_that_did_not_participate() {
        let args = parser(r"pay(?: (?P<amount>\d+))?")
            .parse_arguments("pay")
            .unwrap_or_else(|| panic!("should match"));
        assert!(args.is_empty());
    }
}
