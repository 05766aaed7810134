//! Tests for fixture binding, injection and teardown.

use super::*;
use rstest::{fixture, rstest};
use std::cell::RefCell;
use std::rc::Rc;

#[fixture]
fn log() -> Rc<RefCell<Vec<&'static str>>> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn borrowed_fixture_is_reachable_and_typed() {
    let value = 7_i32;
    let mut ctx = StepContext::new();
    ctx.insert("number", &value);

    assert!(ctx.is_reachable("number"));
    assert_eq!(ctx.get::<i32>("number"), Some(&7));
    assert_eq!(ctx.get::<u8>("number"), None);
}

#[test]
fn fixture_reports_missing_and_mistyped_values() {
    let mut ctx = StepContext::new();
    ctx.provide("name", String::from("cuke"));

    assert!(matches!(
        ctx.fixture::<String>("absent"),
        Err(StepError::MissingFixture { .. })
    ));
    assert!(matches!(
        ctx.fixture::<u32>("name"),
        Err(StepError::FixtureType { .. })
    ));
    assert!(ctx.fixture::<String>("name").is_ok_and(|name| name == "cuke"));
}

#[test]
fn injecting_new_name_round_trips() {
    let mut ctx = StepContext::new();
    assert!(ctx.inject_value("foo", "injected foo").is_ok());

    assert!(ctx.is_reachable("foo"));
    assert_eq!(ctx.get::<&str>("foo"), Some(&"injected foo"));

    let report = ctx.teardown();
    assert_eq!(report.restored, ["foo"]);
    assert!(!ctx.contains("foo"));
    assert!(!ctx.is_reachable("foo"));
}

#[test]
fn injecting_over_existing_fixture_restores_it() {
    let original = String::from("original");
    let mut ctx = StepContext::new();
    ctx.insert("foo", &original);

    assert!(ctx.inject_value("foo", String::from("override")).is_ok());
    assert_eq!(ctx.get::<String>("foo").map(String::as_str), Some("override"));

    ctx.teardown();
    assert_eq!(ctx.get::<String>("foo").map(String::as_str), Some("original"));
    assert!(ctx.is_reachable("foo"), "name was reachable before injection");
}

#[test]
fn stacked_injections_unwind_one_frame_at_a_time() {
    let mut ctx = StepContext::new();
    ctx.provide("n", 0_u32);
    for value in 1..=3_u32 {
        assert!(ctx.inject_value("n", value).is_ok());
    }
    assert_eq!(ctx.get::<u32>("n"), Some(&3));
    assert_eq!(ctx.pending_teardown(), 3);

    ctx.teardown();
    assert_eq!(ctx.get::<u32>("n"), Some(&0));
}

#[test]
fn reachable_order_is_restored_exactly() {
    let mut ctx = StepContext::new();
    ctx.provide("a", 1_u8);
    ctx.provide("b", 2_u8);
    let before: Vec<String> = ctx.reachable_names().map(str::to_owned).collect();

    assert!(ctx.inject_value("c", 3_u8).is_ok());
    assert!(ctx.inject_value("a", 9_u8).is_ok());
    ctx.teardown();

    let after: Vec<String> = ctx.reachable_names().map(str::to_owned).collect();
    assert_eq!(before, after);
    assert_eq!(ctx.get::<u8>("a"), Some(&1));
}

#[rstest]
#[case("", InjectionError::EmptyName)]
#[case(
    "stepwise_stepdef_given_x",
    InjectionError::ReservedName { name: "stepwise_stepdef_given_x".into() }
)]
#[case(
    "stepwise_stepimpl_x",
    InjectionError::ReservedName { name: "stepwise_stepimpl_x".into() }
)]
fn invalid_names_are_rejected_without_mutation(
    #[case] name: &str,
    #[case] expected: InjectionError,
) {
    let mut ctx = StepContext::new();
    assert_eq!(ctx.inject_value(name, 1_u8), Err(expected));
    assert_eq!(ctx.pending_teardown(), 0);
    assert!(!ctx.is_reachable(name));
}

#[rstest]
fn finalizers_and_restores_run_in_reverse_order(log: Rc<RefCell<Vec<&'static str>>>) {
    let mut ctx = StepContext::new();
    let first = Rc::clone(&log);
    ctx.add_finalizer(move || first.borrow_mut().push("first"));
    assert!(ctx.inject_value("x", 1_u8).is_ok());
    let second = Rc::clone(&log);
    ctx.add_finalizer(move || second.borrow_mut().push("second"));

    let report = ctx.teardown();

    assert_eq!(*log.borrow(), ["second", "first"]);
    assert_eq!(report.finalizers_run, 2);
    assert_eq!(report.restored, ["x"]);
    assert!(report.is_clean());
}

#[rstest]
fn panicking_finalizer_does_not_stop_teardown(log: Rc<RefCell<Vec<&'static str>>>) {
    let mut ctx = StepContext::new();
    let survivor = Rc::clone(&log);
    ctx.add_finalizer(move || survivor.borrow_mut().push("survivor"));
    ctx.add_finalizer(|| panic!("finalizer exploded"));
    assert!(ctx.inject_value("x", 1_u8).is_ok());

    let report = ctx.teardown();

    assert_eq!(*log.borrow(), ["survivor"]);
    assert_eq!(report.restored, ["x"]);
    assert_eq!(
        report.failures,
        [FinalizerFailure {
            position: 0,
            message: "finalizer exploded".into(),
        }]
    );
    assert!(!ctx.contains("x"));
}

#[test]
fn teardown_is_idempotent() {
    let mut ctx = StepContext::new();
    assert!(ctx.inject_value("x", 1_u8).is_ok());
    assert_eq!(ctx.teardown().restored.len(), 1);
    assert_eq!(ctx.teardown(), TeardownReport::default());
}

#[rstest]
fn dropping_context_runs_pending_teardown(log: Rc<RefCell<Vec<&'static str>>>) {
    {
        let mut ctx = StepContext::new();
        let inner = Rc::clone(&log);
        ctx.add_finalizer(move || inner.borrow_mut().push("dropped"));
    }
    assert_eq!(*log.borrow(), ["dropped"]);
}
