//! Resolving step lines against the registry and running the matches.
//!
//! A [`StepRunner`] binds a registry to the scopes one test can see. For each
//! step line it collects every matching definition, applies converters to the
//! captured arguments, calls the wrappers in registration order and publishes
//! target fixtures into the [`StepContext`] so later steps can request them.
//!
//! Conjunctions (`And`, `But`) inherit the keyword of the preceding step.
//! [`StepRunner::run_steps`] tracks that chain; [`StepRunner::run_step`]
//! treats a leading conjunction as `Given`.

mod error;

pub use error::ExecutionError;

use std::cmp::Ordering;

use stepwise_patterns::{SpecificityScore, StepKeyword};

use crate::config::{self, MatchPolicy};
use crate::registry::{Reach, RegisteredStep, StepMatch, StepRegistry};
use crate::StepContext;

/// Outcome of one step line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Keyword after conjunction resolution.
    pub keyword: StepKeyword,
    /// Step text as written.
    pub text: String,
    /// Definitions that ran, as `scope::id`, in order.
    pub executed: Vec<String>,
    /// Fixture names published by this line.
    pub injected: Vec<String>,
}

/// Runs step lines for one test.
///
/// # Examples
///
/// ```
/// use std::any::Any;
///
/// use stepwise::parsers::StringParser;
/// use stepwise::{
///     StepArgs, StepContext, StepDefinition, StepError, StepKeyword, StepRegistry, StepRunner,
/// };
///
/// fn answer(_: &StepContext<'_>, _: StepArgs) -> Result<Option<Box<dyn Any>>, StepError> {
///     Ok(Some(Box::new(42_u32)))
/// }
///
/// let mut registry = StepRegistry::new();
/// registry
///     .register(
///         "app",
///         StepDefinition::new(StepKeyword::Given, StringParser::new("the answer"), answer)
///             .with_target_fixture("answer"),
///     )
///     .expect("valid definition");
///
/// let runner = StepRunner::new(&registry, "app::tests");
/// let mut ctx = StepContext::new();
/// let report = runner
///     .run_step(&mut ctx, StepKeyword::Given, "the answer")
///     .expect("step runs");
/// assert_eq!(report.injected, ["answer"]);
/// assert_eq!(ctx.get::<u32>("answer"), Some(&42));
/// ```
#[derive(Debug, Clone)]
pub struct StepRunner<'r> {
    registry: &'r StepRegistry,
    reach: Reach,
    policy: Option<MatchPolicy>,
}

impl<'r> StepRunner<'r> {
    /// Runner seeing `module`, its ancestors and nothing else.
    #[must_use]
    pub fn new(registry: &'r StepRegistry, module: &str) -> Self {
        Self {
            registry,
            reach: Reach::from_module(module),
            policy: None,
        }
    }

    /// Additionally see definitions registered in `scope`.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.reach = self.reach.with_scope(scope);
        self
    }

    /// Replace the visible scopes wholesale.
    #[must_use]
    pub fn with_reach(mut self, reach: Reach) -> Self {
        self.reach = reach;
        self
    }

    /// Fix the match policy instead of reading [`config::match_policy`].
    #[must_use]
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Scopes this runner can see.
    #[must_use]
    pub fn reach(&self) -> &Reach {
        &self.reach
    }

    /// The registry being resolved against.
    #[must_use]
    pub fn registry(&self) -> &'r StepRegistry {
        self.registry
    }

    /// Policy applied when several definitions match.
    #[must_use]
    pub fn match_policy(&self) -> MatchPolicy {
        self.policy.unwrap_or_else(config::match_policy)
    }

    /// Visible definitions for `keyword`, in registration order.
    #[must_use]
    pub fn definitions(&self, keyword: StepKeyword) -> Vec<&'r RegisteredStep> {
        self.registry.reachable(&self.reach, keyword).collect()
    }

    /// Resolve and run one step line.
    ///
    /// Every matching definition runs in registration order unless the match
    /// policy is [`MatchPolicy::MostSpecific`]. For the global registry that
    /// order groups definitions by scope name (see
    /// [`StepRegistry::collect`]); [`with_scope`](Self::with_scope) widens
    /// what is visible without changing the order. The first failure stops the
    /// line; fixtures injected by earlier matches stay injected.
    ///
    /// # Errors
    /// See [`ExecutionError`].
    pub fn run_step(
        &self,
        ctx: &mut StepContext<'_>,
        keyword: StepKeyword,
        text: &str,
    ) -> Result<StepReport, ExecutionError> {
        let keyword = keyword.resolve(&mut None);
        let mut matches = self.registry.find_matches(&self.reach, keyword, text);
        if matches.is_empty() {
            log::debug!("no definition for {keyword} '{text}'");
            return Err(ExecutionError::StepNotFound {
                keyword,
                text: text.to_owned(),
            });
        }
        if self.match_policy() == MatchPolicy::MostSpecific {
            matches = most_specific(matches);
        }

        let mut report = StepReport {
            keyword,
            text: text.to_owned(),
            executed: Vec::with_capacity(matches.len()),
            injected: Vec::new(),
        };
        for StepMatch { step, mut args } in matches {
            let label = format!("{}::{}", step.scope(), step.id());
            let definition = step.context();

            for (name, convert) in definition.converters() {
                args.convert(name, *convert)
                    .map_err(|(raw, message)| ExecutionError::ConversionFailed {
                        step: label.clone(),
                        argument: name.clone(),
                        raw,
                        message,
                    })?;
            }

            log::debug!("running '{label}' for {keyword} '{text}'");
            let value = (definition.run())(&*ctx, args).map_err(|source| {
                ExecutionError::HandlerFailed {
                    step: label.clone(),
                    text: text.to_owned(),
                    source,
                }
            })?;

            match (definition.target_fixture(), value) {
                (Some(name), Some(value)) => {
                    ctx.inject(name, value)
                        .map_err(|source| ExecutionError::InjectionFailed {
                            step: label.clone(),
                            source,
                        })?;
                    report.injected.push(name.to_owned());
                }
                (Some(name), None) => {
                    return Err(ExecutionError::TargetNotProduced {
                        step: label,
                        target: name.to_owned(),
                    });
                }
                (None, _) => {}
            }
            report.executed.push(label);
        }
        Ok(report)
    }

    /// Run a sequence of step lines, resolving `And`/`But` against the
    /// previous keyword. Stops at the first failure.
    ///
    /// # Errors
    /// The first [`ExecutionError`] raised.
    pub fn run_steps<'s, I>(
        &self,
        ctx: &mut StepContext<'_>,
        steps: I,
    ) -> Result<Vec<StepReport>, ExecutionError>
    where
        I: IntoIterator<Item = (StepKeyword, &'s str)>,
    {
        let mut previous = None;
        steps
            .into_iter()
            .map(|(keyword, text)| self.run_step(ctx, keyword.resolve(&mut previous), text))
            .collect()
    }

    /// Run steps parsed from a feature file.
    ///
    /// The parser already folds `And`/`But` into the preceding type, so each
    /// step runs under its recorded type.
    ///
    /// # Errors
    /// The first [`ExecutionError`] raised.
    pub fn run_gherkin_steps(
        &self,
        ctx: &mut StepContext<'_>,
        steps: &[gherkin::Step],
    ) -> Result<Vec<StepReport>, ExecutionError> {
        steps
            .iter()
            .map(|step| {
                let keyword = StepKeyword::try_from(step.ty).map_err(|source| {
                    ExecutionError::UnsupportedKeyword {
                        text: step.value.clone(),
                        source,
                    }
                })?;
                self.run_step(ctx, keyword, &step.value)
            })
            .collect()
    }
}

impl StepRunner<'static> {
    /// Runner over [`StepRegistry::global`].
    #[must_use]
    pub fn for_module(module: &str) -> Self {
        Self::new(StepRegistry::global(), module)
    }
}

fn score(found: &StepMatch<'_>) -> SpecificityScore {
    found.step.context().parser().specificity()
}

/// Highest score wins; ties keep the earliest registration.
fn most_specific(matches: Vec<StepMatch<'_>>) -> Vec<StepMatch<'_>> {
    let mut best: Option<StepMatch<'_>> = None;
    let mut tied = 0usize;
    for candidate in matches {
        match best.as_ref().map(|current| score(&candidate).cmp(&score(current))) {
            None | Some(Ordering::Greater) => {
                best = Some(candidate);
                tied = 0;
            }
            Some(Ordering::Equal) => tied += 1,
            Some(Ordering::Less) => {}
        }
    }
    if let Some(winner) = best.as_ref().filter(|_| tied > 0) {
        log::warn!(
            "{tied} other definition(s) are as specific as '{}'; keeping the earliest",
            winner.step.id()
        );
    }
    best.into_iter().collect()
}

#[cfg(test)]
mod tests;
