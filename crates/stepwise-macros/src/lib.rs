//! Attribute macros registering step definitions with `stepwise`.
//!
//! `#[given]`, `#[when]` and `#[then]` leave the decorated function as it is
//! and submit a `stepwise::Step` record for it, so the function stays
//! callable directly and may carry several step attributes at once.

mod attr;
mod codegen;
mod macros;
mod params;
mod return_classifier;
mod trigger;

use proc_macro::TokenStream;
use stepwise_patterns::StepKeyword;

/// Register a `Given` step.
///
/// ```ignore
/// #[given(parse("a basket with {count:u32} apples"), target_fixture = "basket")]
/// fn basket(count: u32) -> Basket {
///     Basket::with_apples(count)
/// }
/// ```
#[proc_macro_attribute]
pub fn given(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::step_attr(attr, item, StepKeyword::Given)
}

/// Register a `When` step.
///
/// ```ignore
/// #[when(re(r"I eat (?P<count>\d+) apples?"))]
/// fn eat(basket: &Basket, count: u32) {
///     basket.take(count);
/// }
/// ```
#[proc_macro_attribute]
pub fn when(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::step_attr(attr, item, StepKeyword::When)
}

/// Register a `Then` step.
#[proc_macro_attribute]
pub fn then(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::step_attr(attr, item, StepKeyword::Then)
}
