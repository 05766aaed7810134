//! Per-invocation dependency graph and the runtime injector.
//!
//! A `StepContext` maps fixture names to values for one test invocation.
//! Hosts seed it with borrowed fixtures ([`StepContext::insert`]) or owned
//! ones ([`StepContext::provide`]); steps with a target fixture publish their
//! return value through [`StepContext::inject`]. Every injection pushes a
//! restore frame, and [`StepContext::teardown`] unwinds the frames and any
//! user finalizers in reverse order, leaving the graph as it was before the
//! first injection.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use indexmap::IndexSet;

use crate::naming::is_reserved;
use crate::panic::panic_message;
use crate::{InjectionError, StepError};

enum Binding<'a> {
    Borrowed(&'a dyn Any),
    Owned(Box<dyn Any>),
}

impl Binding<'_> {
    fn value(&self) -> &dyn Any {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => value.as_ref(),
        }
    }
}

struct Restore<'a> {
    name: String,
    previous: Option<Binding<'a>>,
    added_to_reachable: bool,
}

enum Teardown<'a> {
    Restore(Restore<'a>),
    Finalizer(Box<dyn FnOnce() + 'a>),
}

/// A finalizer that panicked during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizerFailure {
    /// Position of the finalizer in teardown order, starting at zero.
    pub position: usize,
    /// Rendered panic payload.
    pub message: String,
}

impl fmt::Display for FinalizerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "finalizer #{} panicked: {}", self.position, self.message)
    }
}

/// Outcome of [`StepContext::teardown`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    /// Fixture names restored, in the order they were restored.
    pub restored: Vec<String>,
    /// Number of user finalizers that ran, including failed ones.
    pub finalizers_run: usize,
    /// Finalizers that panicked.
    pub failures: Vec<FinalizerFailure>,
}

impl TeardownReport {
    /// Whether every finalizer completed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fixture bindings for one test invocation.
///
/// # Examples
///
/// ```
/// use stepwise::StepContext;
///
/// let base = 1_u32;
/// let mut ctx = StepContext::new();
/// ctx.insert("count", &base);
///
/// ctx.inject_value("count", 5_u32).expect("valid name");
/// assert_eq!(ctx.get::<u32>("count"), Some(&5));
///
/// ctx.teardown();
/// assert_eq!(ctx.get::<u32>("count"), Some(&1));
/// ```
#[derive(Default)]
pub struct StepContext<'a> {
    bindings: HashMap<String, Binding<'a>>,
    reachable: IndexSet<String>,
    frames: Vec<Teardown<'a>>,
}

impl<'a> StepContext<'a> {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a borrowed fixture and mark it reachable.
    pub fn insert<T: Any>(&mut self, name: impl Into<String>, value: &'a T) {
        self.bind(name.into(), Binding::Borrowed(value));
    }

    /// Bind an owned fixture and mark it reachable.
    pub fn provide<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.bind(name.into(), Binding::Owned(Box::new(value)));
    }

    fn bind(&mut self, name: String, binding: Binding<'a>) {
        self.reachable.insert(name.clone());
        self.bindings.insert(name, binding);
    }

    /// The value bound to `name`, if it has type `T`.
    #[must_use]
    pub fn get<T: Any>(&self, name: &str) -> Option<&T> {
        self.bindings.get(name)?.value().downcast_ref::<T>()
    }

    /// Whether any value is bound to `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Resolve a fixture requested by a step.
    ///
    /// # Errors
    /// [`StepError::MissingFixture`] when nothing is bound and
    /// [`StepError::FixtureType`] when the bound value is not a `T`.
    pub fn fixture<T: Any>(&self, name: &str) -> Result<&T, StepError> {
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| StepError::MissingFixture {
                name: name.to_owned(),
                ty: type_name::<T>(),
            })?;
        binding
            .value()
            .downcast_ref::<T>()
            .ok_or_else(|| StepError::FixtureType {
                name: name.to_owned(),
                expected: type_name::<T>(),
            })
    }

    /// Whether `name` belongs to the set of fixtures this invocation uses.
    #[must_use]
    pub fn is_reachable(&self, name: &str) -> bool {
        self.reachable.contains(name)
    }

    /// Reachable fixture names in the order they became reachable.
    pub fn reachable_names(&self) -> impl Iterator<Item = &str> {
        self.reachable.iter().map(String::as_str)
    }

    /// Publish `value` under `name` until teardown.
    ///
    /// The previous binding, if any, is saved and reinstated by
    /// [`teardown`](Self::teardown). Names not yet reachable become reachable
    /// and stop being so on restore. Injecting the same name again stacks
    /// another frame.
    ///
    /// # Errors
    /// Returns [`InjectionError`] for empty or reserved names. Nothing is
    /// changed in that case.
    pub fn inject(
        &mut self,
        name: impl Into<String>,
        value: Box<dyn Any>,
    ) -> Result<(), InjectionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(InjectionError::EmptyName);
        }
        if is_reserved(&name) {
            return Err(InjectionError::ReservedName { name });
        }

        let added_to_reachable = self.reachable.insert(name.clone());
        let previous = self.bindings.insert(name.clone(), Binding::Owned(value));
        log::debug!(
            "injected fixture '{name}' (previous binding: {}, newly reachable: {added_to_reachable})",
            previous.is_some()
        );
        self.frames.push(Teardown::Restore(Restore {
            name,
            previous,
            added_to_reachable,
        }));
        Ok(())
    }

    /// Typed convenience over [`inject`](Self::inject).
    ///
    /// # Errors
    /// As [`inject`](Self::inject).
    pub fn inject_value<T: Any>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<(), InjectionError> {
        self.inject(name, Box::new(value))
    }

    /// Run `finalizer` during teardown, interleaved in reverse order with
    /// the restore frames.
    pub fn add_finalizer(&mut self, finalizer: impl FnOnce() + 'a) {
        self.frames.push(Teardown::Finalizer(Box::new(finalizer)));
    }

    /// Number of frames still waiting for teardown.
    #[must_use]
    pub fn pending_teardown(&self) -> usize {
        self.frames.len()
    }

    /// Unwind every restore frame and finalizer, most recent first.
    ///
    /// A panicking finalizer is recorded in the report and does not stop the
    /// rest. Calling this again with nothing pending returns an empty report.
    pub fn teardown(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        while let Some(frame) = self.frames.pop() {
            match frame {
                Teardown::Restore(restore) => {
                    report.restored.push(restore.name.clone());
                    self.restore(restore);
                }
                Teardown::Finalizer(finalizer) => {
                    let position = report.finalizers_run;
                    report.finalizers_run += 1;
                    if let Err(payload) = catch_unwind(AssertUnwindSafe(finalizer)) {
                        report.failures.push(FinalizerFailure {
                            position,
                            message: panic_message(payload.as_ref()),
                        });
                    }
                }
            }
        }
        report
    }

    fn restore(&mut self, restore: Restore<'a>) {
        let Restore {
            name,
            previous,
            added_to_reachable,
        } = restore;
        log::debug!(
            "restoring fixture '{name}' (had previous binding: {})",
            previous.is_some()
        );
        if added_to_reachable {
            self.reachable.shift_remove(&name);
        }
        if let Some(binding) = previous {
            self.bindings.insert(name, binding);
            return;
        }
        self.bindings.remove(&name);
    }
}

impl fmt::Debug for StepContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.bindings.keys().collect();
        bound.sort_unstable();
        f.debug_struct("StepContext")
            .field("bound", &bound)
            .field("reachable", &self.reachable)
            .field("pending_teardown", &self.frames.len())
            .finish()
    }
}

impl Drop for StepContext<'_> {
    fn drop(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        for failure in self.teardown().failures {
            log::warn!("{failure} during implicit teardown");
        }
    }
}

#[cfg(test)]
mod tests;
