//! Ranking of overlapping step patterns.
//!
//! Only consulted when the runner is configured to keep the single most
//! specific match instead of running every match.

use crate::PatternError;
use crate::pattern::lexer::{Token, lex_pattern};
use std::cmp::Ordering;

/// How specific a step pattern is.
///
/// Compared by literal character count (more wins), then placeholder count
/// (fewer wins), then typed placeholder count (more wins).
///
/// # Examples
/// ```
/// use stepwise_patterns::SpecificityScore;
///
/// let exact = SpecificityScore::calculate("the output is foo")
///     .expect("valid specific pattern");
/// let generic = SpecificityScore::calculate("the output is {value}")
///     .expect("valid generic pattern");
/// assert!(exact > generic);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpecificityScore {
    /// Literal characters, counted as Unicode scalar values.
    pub literal_chars: usize,
    /// Placeholders of any kind.
    pub placeholder_count: usize,
    /// Placeholders carrying a type hint.
    pub typed_placeholder_count: usize,
}

impl SpecificityScore {
    /// Score a brace-style pattern.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the pattern cannot be lexed.
    pub fn calculate(pattern: &str) -> Result<Self, PatternError> {
        Ok(lex_pattern(pattern)?
            .into_iter()
            .fold(Self::default(), |mut score, token| {
                match token {
                    Token::Literal(text) => score.literal_chars += text.chars().count(),
                    Token::Placeholder(placeholder) => {
                        score.placeholder_count += 1;
                        if placeholder.hint.is_some() {
                            score.typed_placeholder_count += 1;
                        }
                    }
                    Token::OpenBrace { .. } | Token::CloseBrace { .. } => score.literal_chars += 1,
                }
                score
            }))
    }

    /// Score a pattern with no placeholders, such as an exact string.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self {
            literal_chars: text.chars().count(),
            ..Self::default()
        }
    }
}

impl Ord for SpecificityScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.literal_chars
            .cmp(&other.literal_chars)
            .then_with(|| other.placeholder_count.cmp(&self.placeholder_count))
            .then_with(|| {
                self.typed_placeholder_count
                    .cmp(&other.typed_placeholder_count)
            })
    }
}

impl PartialOrd for SpecificityScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(pattern: &str) -> SpecificityScore {
        SpecificityScore::calculate(pattern)
            .unwrap_or_else(|err| panic!("pattern {pattern:?} should score: {err}"))
    }

    #[test]
    fn literal_pattern_beats_placeholder() {
        assert!(score("overlap apples") > score("overlap {item}"));
    }

    #[test]
    fn fewer_placeholders_win_on_equal_literals() {
        let a = score("ab {x}");
        let b = score("a {x} {y}");
        assert_eq!(a.literal_chars, b.literal_chars);
        assert!(a > b);
    }

    #[test]
    fn typed_placeholder_breaks_ties() {
        assert!(score("count is {n:u32}") > score("count is {n}"));
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(score("café {drink}").literal_chars, 5);
    }

    #[test]
    fn escaped_braces_count_once() {
        let escaped = score("value is {{x}}");
        assert_eq!(escaped.literal_chars, 12);
        assert_eq!(escaped.placeholder_count, 0);
    }

    #[test]
    fn literal_constructor_matches_calculated_score() {
        assert_eq!(SpecificityScore::literal("plain text"), score("plain text"));
    }
}
