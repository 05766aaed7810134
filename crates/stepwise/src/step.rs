//! Step definitions: the link-time [`Step`] record written by the step
//! attributes and the owned [`StepDefinition`] the registry keeps.

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use stepwise_patterns::StepKeyword;

use crate::args::{ConvertFn, Converter, StepArgs};
use crate::context::StepContext;
use crate::naming::step_definition_name;
use crate::parsers::{ParserError, ParserSpec, StepParser};
use crate::StepError;

/// Type-erased step implementation.
///
/// Receives the invocation context and the (converted) arguments. `Ok(Some)`
/// carries a value for the definition's target fixture.
pub type StepFn = for<'a> fn(&StepContext<'a>, StepArgs) -> Result<Option<Box<dyn Any>>, StepError>;

/// Converters of one definition, keyed by argument name.
pub type Converters = IndexMap<String, ConvertFn>;

/// Where a definition was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Source file.
    pub file: &'static str,
    /// One-based line.
    pub line: u32,
    /// One-based column.
    pub column: u32,
}

impl Location {
    /// Location of the caller.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let caller = std::panic::Location::caller();
        Self {
            file: caller.file(),
            line: caller.line(),
            column: caller.column(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Link-time registration emitted by `#[given]`, `#[when]` and `#[then]`.
///
/// Collected through `inventory` by
/// [`StepRegistry::collect`](crate::StepRegistry::collect).
#[derive(Debug)]
pub struct Step {
    /// `Given`, `When` or `Then`.
    pub keyword: StepKeyword,
    /// Trigger.
    pub parser: ParserSpec,
    /// Wrapper around the user function.
    pub run: StepFn,
    /// Per-argument converters.
    pub converters: &'static [Converter],
    /// Fixture name the return value is published under.
    pub target_fixture: Option<&'static str>,
    /// Fixtures the implementation requests by name.
    pub fixtures: &'static [&'static str],
    /// Module the definition was written in (`module_path!()`).
    pub scope: &'static str,
    /// Source file.
    pub file: &'static str,
    /// Source line.
    pub line: u32,
    /// Source column.
    pub column: u32,
}

impl Step {
    /// Source location of the record.
    #[must_use]
    pub const fn location(&self) -> Location {
        Location {
            file: self.file,
            line: self.line,
            column: self.column,
        }
    }
}

inventory::collect!(Step);

/// Register a step implementation without the attribute macros.
///
/// The calling module becomes the definition's scope.
///
/// # Examples
///
/// ```
/// use stepwise::{step, StepArgs, StepContext, StepError, StepKeyword};
/// use std::any::Any;
///
/// fn ready(_: &StepContext<'_>, _: StepArgs) -> Result<Option<Box<dyn Any>>, StepError> {
///     Ok(None)
/// }
///
/// step!(StepKeyword::Given, stepwise::parsers::string("the system is ready"), ready);
/// ```
#[macro_export]
macro_rules! step {
    (@target) => { ::core::option::Option::None };
    (@target $target:literal) => { ::core::option::Option::Some($target) };
    ($keyword:expr, $parser:expr, $handler:path $(, target_fixture = $target:literal)? $(,)?) => {
        const _: () = {
            $crate::submit! {
                $crate::Step {
                    keyword: $keyword,
                    parser: $parser,
                    run: $handler,
                    converters: &[],
                    target_fixture: $crate::step!(@target $($target)?),
                    fixtures: &[],
                    scope: module_path!(),
                    file: file!(),
                    line: line!(),
                    column: column!(),
                }
            }
        };
    };
}

/// Everything the registry knows about one step definition.
///
/// Built once and never mutated after registration.
#[derive(Debug)]
pub struct StepDefinition {
    keyword: StepKeyword,
    parser: Box<dyn StepParser>,
    run: StepFn,
    converters: Converters,
    target_fixture: Option<String>,
    fixtures: Vec<String>,
    location: Location,
}

impl StepDefinition {
    /// A definition with no converters, no target fixture and the caller's
    /// location.
    #[must_use]
    #[track_caller]
    pub fn new(keyword: StepKeyword, parser: impl StepParser + 'static, run: StepFn) -> Self {
        Self::from_parts(keyword, Box::new(parser), run, Location::caller())
    }

    fn from_parts(
        keyword: StepKeyword,
        parser: Box<dyn StepParser>,
        run: StepFn,
        location: Location,
    ) -> Self {
        Self {
            keyword,
            parser,
            run,
            converters: Converters::new(),
            target_fixture: None,
            fixtures: Vec::new(),
            location,
        }
    }

    /// Build a definition from a link-time record.
    ///
    /// # Errors
    /// Returns [`ParserError`] when the trigger cannot be built.
    pub fn from_step(step: &Step) -> Result<Self, ParserError> {
        let mut definition =
            Self::from_parts(step.keyword, step.parser.build()?, step.run, step.location());
        for converter in step.converters {
            definition = definition.with_converter(converter.name, converter.convert);
        }
        if let Some(name) = step.target_fixture {
            definition = definition.with_target_fixture(name);
        }
        definition.fixtures = step.fixtures.iter().map(|&name| name.to_owned()).collect();
        Ok(definition)
    }

    /// Convert argument `name` with `convert` before invocation.
    #[must_use]
    pub fn with_converter(mut self, name: impl Into<String>, convert: ConvertFn) -> Self {
        self.converters.insert(name.into(), convert);
        self
    }

    /// Publish the return value under `name`.
    #[must_use]
    pub fn with_target_fixture(mut self, name: impl Into<String>) -> Self {
        self.target_fixture = Some(name.into());
        self
    }

    /// Record the fixtures the implementation requests.
    #[must_use]
    pub fn with_fixtures<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fixtures = names.into_iter().map(Into::into).collect();
        self
    }

    /// Step keyword.
    #[must_use]
    pub fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Parser deciding which lines this definition handles.
    #[must_use]
    pub fn parser(&self) -> &dyn StepParser {
        self.parser.as_ref()
    }

    /// Implementation wrapper.
    #[must_use]
    pub fn run(&self) -> StepFn {
        self.run
    }

    /// Argument converters in declaration order.
    #[must_use]
    pub fn converters(&self) -> &Converters {
        &self.converters
    }

    /// Fixture name the return value is published under.
    #[must_use]
    pub fn target_fixture(&self) -> Option<&str> {
        self.target_fixture.as_deref()
    }

    /// Requested fixture names.
    #[must_use]
    pub fn fixtures(&self) -> &[String] {
        &self.fixtures
    }

    /// Source location.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// Base registry name before collision handling.
    #[must_use]
    pub fn base_name(&self) -> String {
        step_definition_name(self.keyword, self.parser.name())
    }
}
