//! Tests for step resolution and invocation.

use std::any::Any;
use std::cell::RefCell;

use rstest::{fixture, rstest};

use super::*;
use crate::parsers::{PatternParser, StringParser};
use crate::{InjectionError, StepArgs, StepDefinition, StepError, convert_with};

type Log = RefCell<Vec<String>>;
type StepResult = Result<Option<Box<dyn Any>>, StepError>;

fn record(ctx: &StepContext<'_>, entry: String) -> Result<(), StepError> {
    ctx.fixture::<Log>("log")?.borrow_mut().push(entry);
    Ok(())
}

fn general(ctx: &StepContext<'_>, mut args: StepArgs) -> StepResult {
    let first: String = args.take_parsed("first")?;
    let second: String = args.take_parsed("second")?;
    record(ctx, format!("general {first} {second}"))?;
    Ok(None)
}

fn very(ctx: &StepContext<'_>, mut args: StepArgs) -> StepResult {
    let first: String = args.take_parsed("first")?;
    let second: String = args.take_parsed("second")?;
    record(ctx, format!("very {first} {second}"))?;
    Ok(None)
}

fn exact(ctx: &StepContext<'_>, _: StepArgs) -> StepResult {
    record(ctx, "exact".to_owned())?;
    Ok(None)
}

fn make_foo(_: &StepContext<'_>, _: StepArgs) -> StepResult {
    Ok(Some(Box::new(String::from("injected foo"))))
}

fn read_foo(ctx: &StepContext<'_>, _: StepArgs) -> StepResult {
    let foo = ctx.fixture::<String>("foo")?.clone();
    record(ctx, foo)?;
    Ok(None)
}

fn counted(ctx: &StepContext<'_>, mut args: StepArgs) -> StepResult {
    let count: u32 = args.take_converted("count")?;
    record(ctx, format!("count {count}"))?;
    Ok(None)
}

fn failing(_: &StepContext<'_>, _: StepArgs) -> StepResult {
    Err(StepError::failed("disk full"))
}

fn double(raw: &str) -> Result<Box<dyn Any>, String> {
    convert_with(raw, |raw: &str| raw.parse::<u32>().map(|n| n * 2))
}

fn pattern(source: &str) -> PatternParser {
    PatternParser::new(source).unwrap_or_else(|err| panic!("{source}: {err}"))
}

fn add(registry: &mut StepRegistry, definition: StepDefinition) {
    registry
        .register("suite", definition)
        .unwrap_or_else(|err| panic!("registration should succeed: {err}"));
}

#[fixture]
fn registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Given, pattern("the {first} is {second}"), general),
    );
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Given, pattern("the {first} is very {second}"), very),
    );
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Given, StringParser::new("the foo is very bar"), exact),
    );
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Given, StringParser::new("a foo"), make_foo)
            .with_target_fixture("foo"),
    );
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Then, StringParser::new("foo is visible"), read_foo)
            .with_fixtures(["foo", "log"]),
    );
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::When, pattern("I count {count}"), counted)
            .with_converter("count", double),
    );
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::When, StringParser::new("it breaks"), failing),
    );
    registry
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

#[rstest]
fn every_match_runs_in_registration_order(registry: StepRegistry) {
    let log = Log::default();
    let mut ctx = StepContext::new();
    ctx.insert("log", &log);
    let runner = StepRunner::new(&registry, "suite").with_match_policy(MatchPolicy::All);

    let report = runner
        .run_step(&mut ctx, StepKeyword::Given, "the foo is very bar")
        .unwrap_or_else(|err| panic!("step should run: {err}"));

    assert_eq!(report.executed.len(), 2);
    assert_eq!(entries(&log), ["very foo bar", "exact"]);
}

#[rstest]
fn general_pattern_handles_short_line(registry: StepRegistry) {
    let log = Log::default();
    let mut ctx = StepContext::new();
    ctx.insert("log", &log);
    let runner = StepRunner::new(&registry, "suite").with_match_policy(MatchPolicy::All);

    assert!(runner.run_step(&mut ctx, StepKeyword::Given, "the foo is bar").is_ok());
    assert_eq!(entries(&log), ["general foo bar"]);
}

#[rstest]
fn most_specific_policy_runs_one_definition(registry: StepRegistry) {
    let log = Log::default();
    let mut ctx = StepContext::new();
    ctx.insert("log", &log);
    let runner =
        StepRunner::new(&registry, "suite").with_match_policy(MatchPolicy::MostSpecific);

    let report = runner
        .run_step(&mut ctx, StepKeyword::Given, "the foo is very bar")
        .unwrap_or_else(|err| panic!("step should run: {err}"));

    assert_eq!(report.executed.len(), 1);
    assert_eq!(entries(&log), ["exact"]);
}

#[rstest]
fn target_fixture_is_visible_to_later_steps(registry: StepRegistry) {
    let log = Log::default();
    let mut ctx = StepContext::new();
    ctx.insert("log", &log);
    let runner = StepRunner::new(&registry, "suite");

    let reports = runner
        .run_steps(
            &mut ctx,
            [
                (StepKeyword::Given, "a foo"),
                (StepKeyword::Then, "foo is visible"),
            ],
        )
        .unwrap_or_else(|err| panic!("steps should run: {err}"));

    assert_eq!(reports.first().map(|r| r.injected.clone()), Some(vec!["foo".to_owned()]));
    assert_eq!(entries(&log), ["injected foo"]);

    ctx.teardown();
    assert!(!ctx.contains("foo"));
}

#[rstest]
fn conjunctions_follow_previous_keyword(registry: StepRegistry) {
    let log = Log::default();
    let mut ctx = StepContext::new();
    ctx.insert("log", &log);
    let runner = StepRunner::new(&registry, "suite");

    let reports = runner
        .run_steps(
            &mut ctx,
            [
                (StepKeyword::When, "I count 2"),
                (StepKeyword::And, "I count 5"),
            ],
        )
        .unwrap_or_else(|err| panic!("steps should run: {err}"));

    let keywords: Vec<_> = reports.iter().map(|r| r.keyword).collect();
    assert_eq!(keywords, [StepKeyword::When, StepKeyword::When]);
    assert_eq!(entries(&log), ["count 4", "count 10"]);
}

#[rstest]
fn leading_conjunction_resolves_to_given(registry: StepRegistry) {
    let mut ctx = StepContext::new();
    let runner = StepRunner::new(&registry, "suite");
    let report = runner
        .run_step(&mut ctx, StepKeyword::But, "a foo")
        .unwrap_or_else(|err| panic!("step should run: {err}"));
    assert_eq!(report.keyword, StepKeyword::Given);
}

#[rstest]
fn conversion_failure_names_the_argument(registry: StepRegistry) {
    let mut ctx = StepContext::new();
    let runner = StepRunner::new(&registry, "suite");
    let err = runner
        .run_step(&mut ctx, StepKeyword::When, "I count lots")
        .err();
    assert!(matches!(
        err,
        Some(ExecutionError::ConversionFailed { ref argument, ref raw, .. })
            if argument == "count" && raw == "lots"
    ));
}

#[rstest]
fn handler_error_is_reported(registry: StepRegistry) {
    let mut ctx = StepContext::new();
    let runner = StepRunner::new(&registry, "suite");
    let err = runner
        .run_step(&mut ctx, StepKeyword::When, "it breaks")
        .err();
    assert!(matches!(
        err,
        Some(ExecutionError::HandlerFailed { source: StepError::Failed { ref message }, .. })
            if message == "disk full"
    ));
}

#[rstest]
fn missing_fixture_fails_the_step(registry: StepRegistry) {
    let mut ctx = StepContext::new();
    let runner = StepRunner::new(&registry, "suite");
    let err = runner
        .run_step(&mut ctx, StepKeyword::Then, "foo is visible")
        .err();
    assert!(matches!(
        err,
        Some(ExecutionError::HandlerFailed {
            source: StepError::MissingFixture { .. },
            ..
        })
    ));
}

#[rstest]
#[case(StepKeyword::Given, "nothing registered here")]
#[case(StepKeyword::Then, "a foo")]
fn unmatched_lines_are_not_found(
    registry: StepRegistry,
    #[case] keyword: StepKeyword,
    #[case] text: &str,
) {
    let mut ctx = StepContext::new();
    let runner = StepRunner::new(&registry, "suite");
    let err = runner.run_step(&mut ctx, keyword, text).err();
    assert!(err.as_ref().is_some_and(ExecutionError::is_not_found));
}

#[rstest]
fn definitions_outside_reach_are_invisible(registry: StepRegistry) {
    let mut ctx = StepContext::new();
    let runner = StepRunner::new(&registry, "elsewhere");
    assert!(runner.definitions(StepKeyword::Given).is_empty());
    assert!(
        runner
            .run_step(&mut ctx, StepKeyword::Given, "a foo")
            .is_err_and(|err| err.is_not_found())
    );

    let imported = runner.with_scope("suite");
    assert_eq!(imported.definitions(StepKeyword::Given).len(), 4);
}

fn reserved_target(_: &StepContext<'_>, _: StepArgs) -> StepResult {
    Ok(Some(Box::new(1_u8)))
}

#[test]
fn reserved_target_fixture_fails_injection() {
    let mut registry = StepRegistry::new();
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Given, StringParser::new("bad"), reserved_target)
            .with_target_fixture("stepwise_stepdef_given_bad"),
    );
    let mut ctx = StepContext::new();
    let err = StepRunner::new(&registry, "suite")
        .run_step(&mut ctx, StepKeyword::Given, "bad")
        .err();
    assert!(matches!(
        err,
        Some(ExecutionError::InjectionFailed {
            source: InjectionError::ReservedName { .. },
            ..
        })
    ));
}

fn forgets_value(_: &StepContext<'_>, _: StepArgs) -> StepResult {
    Ok(None)
}

#[test]
fn declared_target_without_value_is_reported() {
    let mut registry = StepRegistry::new();
    add(
        &mut registry,
        StepDefinition::new(StepKeyword::Given, StringParser::new("a cart"), forgets_value)
            .with_target_fixture("cart"),
    );
    let mut ctx = StepContext::new();
    let err = StepRunner::new(&registry, "suite")
        .run_step(&mut ctx, StepKeyword::Given, "a cart")
        .err();
    assert!(matches!(
        err,
        Some(ExecutionError::TargetNotProduced { ref step, ref target })
            if step == "suite::stepwise_stepdef_given_a cart" && target == "cart"
    ));
    assert!(!ctx.contains("cart"));
}
