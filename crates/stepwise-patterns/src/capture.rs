//! Capture extraction for compiled step patterns.

use regex::Regex;

/// Return the placeholder captures when `text` matches `re`, or `None`.
///
/// Group 0 is skipped so only placeholder groups contribute. Groups that did
/// not participate yield empty strings, keeping the result aligned with the
/// placeholder names of the pattern.
///
/// # Examples
/// ```
/// # use regex::Regex;
/// # use stepwise_patterns::extract_captured_values;
/// let regex = Regex::new(r"^(\d+)-(\w+)$")
///     .expect("example ensures fallible call succeeds");
/// let values = extract_captured_values(&regex, "42-answer")
///     .expect("example ensures fallible call succeeds");
/// assert_eq!(values, vec!["42".to_string(), "answer".to_string()]);
/// assert!(extract_captured_values(&regex, "nope").is_none());
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    let caps = re.captures(text)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|capture| capture.map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex(source: &str) -> Regex {
        Regex::new(source).unwrap_or_else(|err| panic!("test regex must compile: {err}"))
    }

    #[test]
    fn returns_none_when_pattern_does_not_match() {
        assert!(extract_captured_values(&regex(r"^(\d+)$"), "nope").is_none());
    }

    #[test]
    fn collects_captures_in_order() {
        let captures = extract_captured_values(&regex(r"^(\d+)-(\w+)-(\d+)$"), "12-answer-7");
        assert_eq!(
            captures,
            Some(vec![
                String::from("12"),
                String::from("answer"),
                String::from("7")
            ])
        );
    }

    #[test]
    fn empty_string_for_groups_that_did_not_participate() {
        let captures = extract_captured_values(&regex(r"^(a)?(b)?$"), "a");
        assert_eq!(captures, Some(vec![String::from("a"), String::new()]));
    }

    #[test]
    fn empty_capture_is_preserved() {
        let captures = extract_captured_values(&regex(r"^the (\S*)$"), "the ");
        assert_eq!(captures, Some(vec![String::new()]));
    }
}
