//! Collision-free names for registered step definitions.
//!
//! Every registration gets an identifier of the form
//! `stepwise_stepdef_{keyword}_{parser name}`. When a scope already holds
//! that identifier (the same trigger registered twice, or one function
//! carrying several identical attributes) a numeric suffix is appended.

use std::collections::HashSet;
use std::hash::BuildHasher;

use stepwise_patterns::StepKeyword;

/// Prefix of every step definition identifier.
pub const STEP_DEF_PREFIX: &str = "stepwise_stepdef";

/// Prefix reserved for step implementation names. Nothing registers under it
/// yet, but fixtures may not use it either.
pub const STEP_IMPL_PREFIX: &str = "stepwise_stepimpl";

pub(crate) const RESERVED_PREFIXES: [&str; 2] = [STEP_DEF_PREFIX, STEP_IMPL_PREFIX];

/// Return `name` if it is not in `seen`, otherwise the first of `name_1`,
/// `name_2`, … that is not.
///
/// The result depends only on the inputs.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use stepwise::naming::find_unique_name;
///
/// let mut seen = HashSet::new();
/// assert_eq!(find_unique_name("step", &seen), "step");
/// seen.insert("step".to_owned());
/// seen.insert("step_1".to_owned());
/// assert_eq!(find_unique_name("step", &seen), "step_2");
/// ```
#[must_use]
pub fn find_unique_name<S: BuildHasher>(name: &str, seen: &HashSet<String, S>) -> String {
    if !seen.contains(name) {
        return name.to_owned();
    }
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{name}_{suffix}");
        if !seen.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Base identifier for a definition with the given keyword and parser name.
///
/// ```
/// use stepwise::naming::step_definition_name;
/// use stepwise::StepKeyword;
///
/// assert_eq!(
///     step_definition_name(StepKeyword::Given, "a {count} apples"),
///     "stepwise_stepdef_given_a {count} apples"
/// );
/// ```
#[must_use]
pub fn step_definition_name(keyword: StepKeyword, parser_name: &str) -> String {
    format!("{STEP_DEF_PREFIX}_{}_{parser_name}", keyword.as_lowercase())
}

/// Whether `name` falls in a namespace reserved for step definitions.
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}
