//! Step registry and discovery.
//!
//! Definitions are stored per scope (the module that registered them) in
//! registration order. Link-time records emitted by the step attributes are
//! gathered by [`StepRegistry::collect`]; [`StepRegistry::global`] holds the
//! process-wide collection.

use std::collections::HashSet;
use std::sync::LazyLock;

use hashbrown::HashMap;
use indexmap::IndexMap;
use stepwise_patterns::StepKeyword;
use thiserror::Error;

use crate::StepArgs;
use crate::naming::find_unique_name;
use crate::parsers::ParserError;
use crate::step::{Location, Step, StepDefinition};

#[cfg(feature = "diagnostics")]
mod diagnostics;
mod reach;

pub use reach::Reach;

/// Failure to register a step definition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// The trigger could not be turned into a parser.
    #[error("invalid trigger for {keyword} step at {location}: {source}")]
    InvalidParser {
        /// Keyword of the offending definition.
        keyword: StepKeyword,
        /// Where it was written.
        location: Location,
        /// Parser construction error.
        #[source]
        source: ParserError,
    },
    /// Definitions must use `Given`, `When` or `Then`.
    #[error("step at {location} is registered under {keyword}; use Given, When or Then")]
    ConjunctionKeyword {
        /// Offending keyword.
        keyword: StepKeyword,
        /// Where it was written.
        location: Location,
    },
}

/// A definition as stored in the registry.
#[derive(Debug)]
pub struct RegisteredStep {
    id: String,
    scope: String,
    definition: StepDefinition,
}

impl RegisteredStep {
    /// Identifier, unique within [`scope`](Self::scope).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Module the definition was registered in.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The step definition context.
    #[must_use]
    pub fn context(&self) -> &StepDefinition {
        &self.definition
    }
}

/// A definition whose parser accepted a step line, with the arguments it
/// extracted.
#[derive(Debug)]
pub struct StepMatch<'r> {
    /// Matching definition.
    pub step: &'r RegisteredStep,
    /// Raw arguments, before converters.
    pub args: StepArgs,
}

/// Ordered collection of step definitions.
///
/// # Examples
///
/// ```
/// use stepwise::parsers::StringParser;
/// use stepwise::{Reach, StepArgs, StepContext, StepDefinition, StepError, StepKeyword, StepRegistry};
/// use std::any::Any;
///
/// fn noop(_: &StepContext<'_>, _: StepArgs) -> Result<Option<Box<dyn Any>>, StepError> {
///     Ok(None)
/// }
///
/// let mut registry = StepRegistry::new();
/// let id = registry
///     .register("app::tests", StepDefinition::new(StepKeyword::Given, StringParser::new("a user"), noop))
///     .expect("valid definition");
/// assert_eq!(id, "stepwise_stepdef_given_a user");
///
/// let reach = Reach::from_module("app::tests");
/// assert_eq!(registry.find_matches(&reach, StepKeyword::Given, "a user").len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StepRegistry {
    entries: Vec<RegisteredStep>,
    names: HashMap<String, HashSet<String>>,
}

static GLOBAL: LazyLock<StepRegistry> = LazyLock::new(|| {
    StepRegistry::collect()
        .unwrap_or_else(|err| panic!("failed to collect step definitions: {err}"))
});

impl StepRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gather every step registered at link time.
    ///
    /// Records are ordered by scope name, then file, line and column, so the
    /// order matches the source and does not depend on link order. Across
    /// scopes the order is lexicographic by module path: a runner that
    /// reaches several scopes runs their definitions grouped by scope name,
    /// whatever order the scopes were added in.
    ///
    /// # Errors
    /// Returns the first [`RegistryError`] encountered.
    pub fn collect() -> Result<Self, RegistryError> {
        let mut steps: Vec<&'static Step> = inventory::iter::<Step>.into_iter().collect();
        steps.sort_by_key(|step| (step.scope, step.file, step.line, step.column));

        let mut registry = Self::new();
        for step in steps {
            let definition =
                StepDefinition::from_step(step).map_err(|source| RegistryError::InvalidParser {
                    keyword: step.keyword,
                    location: step.location(),
                    source,
                })?;
            registry.register(step.scope, definition)?;
        }
        log::debug!("collected {} step definitions", registry.len());
        Ok(registry)
    }

    /// The registry built from link-time records, collected on first use.
    ///
    /// # Panics
    /// Panics when a link-time record has an invalid trigger.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Append `definition` to `scope` and return its identifier.
    ///
    /// # Errors
    /// Rejects definitions registered under `And` or `But`.
    pub fn register(
        &mut self,
        scope: impl Into<String>,
        definition: StepDefinition,
    ) -> Result<String, RegistryError> {
        let keyword = definition.keyword();
        if keyword.is_conjunction() {
            return Err(RegistryError::ConjunctionKeyword {
                keyword,
                location: definition.location(),
            });
        }
        let scope = scope.into();
        let taken = self.names.entry(scope.clone()).or_default();
        let id = find_unique_name(&definition.base_name(), taken);
        taken.insert(id.clone());
        log::debug!(
            "registered {keyword} step '{}' as '{id}' in {scope} ({})",
            definition.parser().name(),
            definition.location()
        );
        self.entries.push(RegisteredStep {
            id: id.clone(),
            scope,
            definition,
        });
        Ok(id)
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredStep> {
        self.entries.iter()
    }

    /// Definitions registered in exactly `scope`.
    pub fn in_scope<'r>(&'r self, scope: &'r str) -> impl Iterator<Item = &'r RegisteredStep> {
        self.entries.iter().filter(move |step| step.scope == scope)
    }

    /// Look up a definition by scope and identifier.
    #[must_use]
    pub fn get(&self, scope: &str, id: &str) -> Option<&RegisteredStep> {
        self.entries
            .iter()
            .find(|step| step.scope == scope && step.id == id)
    }

    /// Definitions of `keyword` visible from `reach`, in registration order.
    pub fn reachable<'r>(
        &'r self,
        reach: &Reach,
        keyword: StepKeyword,
    ) -> impl Iterator<Item = &'r RegisteredStep> {
        self.entries.iter().filter(move |step| {
            step.definition.keyword() == keyword && reach.contains(&step.scope)
        })
    }

    /// Every visible definition of `keyword` whose parser accepts `text`, in
    /// registration order.
    #[must_use]
    pub fn find_matches<'r>(
        &'r self,
        reach: &Reach,
        keyword: StepKeyword,
        text: &str,
    ) -> Vec<StepMatch<'r>> {
        let matches: Vec<_> = self
            .entries
            .iter()
            .filter(|step| step.definition.keyword() == keyword && reach.contains(&step.scope))
            .filter_map(|step| {
                step.definition
                    .parser()
                    .parse_arguments(text)
                    .map(|args| StepMatch { step, args })
            })
            .collect();
        log::debug!(
            "{} definition(s) match {keyword} '{text}'",
            matches.len()
        );
        matches
    }

    /// Groups of definitions in one scope sharing keyword and parser name.
    ///
    /// Such definitions all run for a matching line, which is usually not
    /// what the author intended.
    #[must_use]
    pub fn duplicates(&self) -> Vec<Vec<&RegisteredStep>> {
        let mut groups: IndexMap<(&str, StepKeyword, &str), Vec<&RegisteredStep>> =
            IndexMap::new();
        for step in &self.entries {
            groups
                .entry((
                    step.scope.as_str(),
                    step.definition.keyword(),
                    step.definition.parser().name(),
                ))
                .or_default()
                .push(step);
        }
        groups
            .into_values()
            .filter(|group| group.len() > 1)
            .collect()
    }

    /// Serialise the registry as JSON for external tooling.
    ///
    /// # Errors
    /// Returns an error if serialisation fails.
    #[cfg(feature = "diagnostics")]
    pub fn dump(&self) -> serde_json::Result<String> {
        diagnostics::dump(self)
    }
}
