//! Arguments extracted from a step line and the converters applied to them.

use std::any::{Any, type_name};
use std::fmt;
use std::str::FromStr;

use crate::StepError;

/// Signature of a type-erased argument converter.
pub type ConvertFn = fn(&str) -> Result<Box<dyn Any>, String>;

/// A converter bound to an argument name, as stored in link-time
/// registrations.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    /// Argument the converter applies to.
    pub name: &'static str,
    /// Conversion function.
    pub convert: ConvertFn,
}

/// Run a typed conversion and erase the result.
///
/// The step attributes use this to adapt user converters of the shape
/// `Fn(&str) -> Result<T, E>` into a [`ConvertFn`].
///
/// # Errors
/// Returns the rendered error when `convert` fails.
///
/// # Examples
/// ```
/// use stepwise::convert_with;
/// let boxed = convert_with("12", str::parse::<u8>).expect("valid number");
/// assert_eq!(boxed.downcast_ref::<u8>(), Some(&12));
/// assert!(convert_with("x", str::parse::<u8>).is_err());
/// ```
pub fn convert_with<T, E, F>(raw: &str, convert: F) -> Result<Box<dyn Any>, String>
where
    T: Any,
    E: fmt::Display,
    F: FnOnce(&str) -> Result<T, E>,
{
    convert(raw)
        .map(|value| Box::new(value) as Box<dyn Any>)
        .map_err(|err| err.to_string())
}

/// A single argument value.
pub enum ArgValue {
    /// Text captured by the parser.
    Raw(String),
    /// Output of a converter.
    Converted(Box<dyn Any>),
}

impl ArgValue {
    /// The captured text, if no converter has run yet.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Converted(_) => None,
        }
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(raw) => f.debug_tuple("Raw").field(raw).finish(),
            Self::Converted(_) => f.write_str("Converted(..)"),
        }
    }
}

/// Named arguments in the order the parser produced them.
///
/// # Examples
/// ```
/// use stepwise::StepArgs;
///
/// let mut args = StepArgs::new();
/// args.push("count", "3");
/// assert_eq!(args.raw("count"), Some("3"));
/// assert_eq!(args.take_parsed::<u32>("count").expect("parses"), 3);
/// assert!(args.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct StepArgs {
    values: Vec<(String, ArgValue)>,
}

impl StepArgs {
    /// An empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw argument. A repeated name replaces the earlier value.
    pub fn push(&mut self, name: impl Into<String>, raw: impl Into<String>) {
        let name = name.into();
        let value = ArgValue::Raw(raw.into());
        if let Some(slot) = self.slot_mut(&name) {
            *slot = value;
            return;
        }
        self.values.push((name, value));
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Name and value pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Whether an argument of this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(existing, _)| existing == name)
    }

    /// Raw text of an unconverted argument.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(existing, _)| existing == name)
            .and_then(|(_, value)| value.as_raw())
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut ArgValue> {
        self.values
            .iter_mut()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Apply `convert` to the named argument in place.
    ///
    /// Arguments that are absent or already converted are left alone.
    ///
    /// # Errors
    /// Returns the raw text and converter message when conversion fails.
    pub fn convert(&mut self, name: &str, convert: ConvertFn) -> Result<(), (String, String)> {
        let Some(slot) = self.slot_mut(name) else {
            return Ok(());
        };
        let ArgValue::Raw(raw) = slot else {
            return Ok(());
        };
        let converted = convert(raw).map_err(|message| (raw.clone(), message))?;
        *slot = ArgValue::Converted(converted);
        Ok(())
    }

    fn take(&mut self, name: &str) -> Result<ArgValue, StepError> {
        let index = self
            .values
            .iter()
            .position(|(existing, _)| existing == name)
            .ok_or_else(|| StepError::MissingArgument {
                name: name.to_owned(),
            })?;
        Ok(self.values.remove(index).1)
    }

    /// Remove the named argument and parse it with [`FromStr`].
    ///
    /// A converted value is accepted as well when it already has type `T`.
    ///
    /// # Errors
    /// Fails when the argument is missing, does not parse, or was converted
    /// into another type.
    pub fn take_parsed<T>(&mut self, name: &str) -> Result<T, StepError>
    where
        T: FromStr + Any,
        T::Err: fmt::Display,
    {
        match self.take(name)? {
            ArgValue::Raw(raw) => raw.parse().map_err(|err: T::Err| StepError::InvalidArgument {
                name: name.to_owned(),
                message: err.to_string(),
                raw,
            }),
            ArgValue::Converted(value) => downcast_arg(name, value),
        }
    }

    /// Remove the named argument, which a converter must already have
    /// turned into a `T`.
    ///
    /// # Errors
    /// Fails when the argument is missing, still raw, or of another type.
    pub fn take_converted<T: Any>(&mut self, name: &str) -> Result<T, StepError> {
        match self.take(name)? {
            ArgValue::Converted(value) => downcast_arg(name, value),
            ArgValue::Raw(_) => Err(StepError::ArgumentType {
                name: name.to_owned(),
                expected: type_name::<T>(),
            }),
        }
    }
}

fn downcast_arg<T: Any>(name: &str, value: Box<dyn Any>) -> Result<T, StepError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| StepError::ArgumentType {
            name: name.to_owned(),
            expected: type_name::<T>(),
        })
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests assert on fallible conversions")]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, &str)]) -> StepArgs {
        let mut args = StepArgs::new();
        for &(name, raw) in pairs {
            args.push(name, raw);
        }
        args
    }

    fn shout(raw: &str) -> Result<Box<dyn Any>, String> {
        convert_with(raw, |s: &str| Ok::<_, String>(s.to_uppercase()))
    }

    fn positive(raw: &str) -> Result<Box<dyn Any>, String> {
        convert_with(raw, |s: &str| match s.parse::<i64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("{s} is not positive")),
        })
    }

    #[test]
    fn preserves_parser_order() {
        let args = args(&[("b", "1"), ("a", "2")]);
        assert_eq!(args.names().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn repeated_push_replaces_value() {
        let args = args(&[("a", "1"), ("a", "2")]);
        assert_eq!(args.len(), 1);
        assert_eq!(args.raw("a"), Some("2"));
    }

    #[test]
    fn take_parsed_reports_invalid_text() {
        let mut args = args(&[("count", "many")]);
        let err = args
            .take_parsed::<u32>("count")
            .expect_err("text is not a number");
        assert!(matches!(
            err,
            StepError::InvalidArgument { ref name, ref raw, .. } if name == "count" && raw == "many"
        ));
    }

    #[test]
    fn take_reports_missing_argument() {
        let mut args = StepArgs::new();
        assert!(matches!(
            args.take_parsed::<String>("absent"),
            Err(StepError::MissingArgument { .. })
        ));
    }

    #[test]
    fn converter_replaces_raw_value() {
        let mut args = args(&[("word", "hi")]);
        args.convert("word", shout).expect("conversion succeeds");
        assert_eq!(args.raw("word"), None);
        assert_eq!(
            args.take_converted::<String>("word").expect("converted"),
            "HI"
        );
    }

    #[test]
    fn converter_failure_carries_raw_text() {
        let mut args = args(&[("n", "-3")]);
        let (raw, message) = args.convert("n", positive).expect_err("negative");
        assert_eq!(raw, "-3");
        assert_eq!(message, "-3 is not positive");
    }

    #[test]
    fn converter_for_absent_argument_is_ignored() {
        let mut args = args(&[("a", "1")]);
        assert!(args.convert("b", shout).is_ok());
        assert_eq!(args.raw("a"), Some("1"));
    }

    #[test]
    fn converted_value_of_wrong_type_is_rejected() {
        let mut args = args(&[("n", "4")]);
        args.convert("n", positive).expect("positive");
        assert!(matches!(
            args.take_converted::<u8>("n"),
            Err(StepError::ArgumentType { .. })
        ));
    }

    #[test]
    fn take_parsed_accepts_matching_converted_value() {
        let mut args = args(&[("n", "4")]);
        args.convert("n", positive).expect("positive");
        assert_eq!(args.take_parsed::<i64>("n").expect("same type"), 4);
    }
}
