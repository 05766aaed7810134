//! Placeholder type hints and the regex fragments they compile to.
//!
//! An untyped placeholder captures one whitespace-free token, which may be
//! empty. That keeps `the {first} is {second}` from swallowing
//! `the foo is very bar` and lets an empty Examples cell still bind. Use the
//! `text` hint to capture across spaces.

/// Regex fragment for an untyped placeholder.
pub(crate) const TOKEN_PATTERN: &str = r"\S*";

/// Translate a placeholder type hint into a regular-expression fragment.
///
/// # Examples
/// ```
/// use stepwise_patterns::get_type_pattern;
/// assert_eq!(get_type_pattern(Some("u32")), r"\d+");
/// assert_eq!(get_type_pattern(Some("text")), r".*?");
/// assert_eq!(get_type_pattern(None), r"\S*");
/// ```
#[must_use]
pub fn get_type_pattern(type_hint: Option<&str>) -> &'static str {
    match type_hint {
        Some("u8" | "u16" | "u32" | "u64" | "u128" | "usize") => r"\d+",
        Some("i8" | "i16" | "i32" | "i64" | "i128" | "isize") => r"[+-]?\d+",
        Some("f32" | "f64") => {
            r"(?i:(?:[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?|nan|inf|infinity))"
        }
        Some("text" | "String") => r".*?",
        _ => TOKEN_PATTERN,
    }
}
