//! Step registration, matching and fixture injection for behaviour-driven
//! tests.
//!
//! Step implementations are ordinary functions decorated with `#[given]`,
//! `#[when]` or `#[then]` from `stepwise-macros`. Each attribute leaves the
//! function untouched and submits a [`Step`] record at link time. The
//! [`StepRegistry`] collects those records in source order, and a
//! [`StepRunner`] resolves step lines against them, runs every matching
//! definition and publishes target fixtures into the [`StepContext`].
//!
//! ```
//! use std::any::Any;
//!
//! use stepwise::parsers::PatternParser;
//! use stepwise::{StepArgs, StepContext, StepDefinition, StepError, StepKeyword, StepRegistry, StepRunner};
//!
//! fn pour(_: &StepContext<'_>, mut args: StepArgs) -> Result<Option<Box<dyn Any>>, StepError> {
//!     let cups: u32 = args.take_parsed("cups")?;
//!     Ok(Some(Box::new(cups)))
//! }
//!
//! let mut registry = StepRegistry::new();
//! let parser = PatternParser::new("I pour {cups:u32} cups").expect("valid pattern");
//! registry
//!     .register(
//!         "kitchen",
//!         StepDefinition::new(StepKeyword::When, parser, pour).with_target_fixture("cups"),
//!     )
//!     .expect("valid definition");
//!
//! let mut ctx = StepContext::new();
//! StepRunner::new(&registry, "kitchen")
//!     .run_step(&mut ctx, StepKeyword::When, "I pour 3 cups")
//!     .expect("step runs");
//! assert_eq!(ctx.get::<u32>("cups"), Some(&3));
//! ```

pub use inventory::submit;

mod args;
pub mod config;
mod context;
mod error;
pub mod execution;
pub mod naming;
mod panic;
pub mod parsers;
mod registry;
mod step;

pub use args::{ArgValue, ConvertFn, Converter, StepArgs, convert_with};
pub use config::MatchPolicy;
pub use context::{FinalizerFailure, StepContext, TeardownReport};
pub use error::{InjectionError, StepError};
pub use execution::{ExecutionError, StepReport, StepRunner};
pub use panic::panic_message;
pub use registry::{Reach, RegisteredStep, RegistryError, StepMatch, StepRegistry};
pub use step::{Converters, Location, Step, StepDefinition, StepFn};
pub use stepwise_patterns::{
    PatternError, SpecificityScore, StepKeyword, StepKeywordParseError, UnsupportedStepType,
};
