//! Arguments of `#[given]`, `#[when]` and `#[then]`.
//!
//! ```text
//! #[given(trigger)]
//! #[given(trigger, converters(name = expr, ...))]
//! #[given(trigger, target_fixture = "name")]
//! ```

use std::collections::HashSet;

use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{Expr, Ident, LitStr, Token};

use crate::trigger::Trigger;

const RESERVED_PREFIXES: [&str; 2] = ["stepwise_stepdef", "stepwise_stepimpl"];

pub(crate) struct ConverterArg {
    pub(crate) name: Ident,
    pub(crate) expr: Expr,
}

impl ConverterArg {
    pub(crate) fn key(&self) -> String {
        self.name.unraw().to_string()
    }
}

impl Parse for ConverterArg {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let name = input.call(Ident::parse_any)?;
        input.parse::<Token![=]>()?;
        let expr = input.parse()?;
        Ok(Self { name, expr })
    }
}

pub(crate) struct StepAttrArgs {
    pub(crate) trigger: Trigger,
    pub(crate) converters: Vec<ConverterArg>,
    pub(crate) target_fixture: Option<LitStr>,
}

impl Parse for StepAttrArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.is_empty() {
            return Err(input.error("expected a step trigger, e.g. `#[given(\"a user\")]`"));
        }
        let trigger = Trigger::classify(input.parse()?)?;
        let mut converters: Option<Vec<ConverterArg>> = None;
        let mut target_fixture = None;

        while !input.is_empty() {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                break;
            }
            let key: Ident = input.parse()?;
            if key == "converters" {
                if converters.is_some() {
                    return Err(syn::Error::new_spanned(key, "duplicate `converters`"));
                }
                let content;
                syn::parenthesized!(content in input);
                let entries = content.parse_terminated(ConverterArg::parse, Token![,])?;
                converters = Some(unique_converters(entries.into_iter().collect())?);
            } else if key == "target_fixture" {
                if target_fixture.is_some() {
                    return Err(syn::Error::new_spanned(key, "duplicate `target_fixture`"));
                }
                input.parse::<Token![=]>()?;
                target_fixture = Some(validate_target_fixture(input.parse()?)?);
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected `converters(...)` or `target_fixture = \"...\"`",
                ));
            }
        }

        Ok(Self {
            trigger,
            converters: converters.unwrap_or_default(),
            target_fixture,
        })
    }
}

fn unique_converters(entries: Vec<ConverterArg>) -> syn::Result<Vec<ConverterArg>> {
    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.key()) {
            return Err(syn::Error::new_spanned(
                &entry.name,
                format!("duplicate converter for `{}`", entry.key()),
            ));
        }
    }
    Ok(entries)
}

fn validate_target_fixture(lit: LitStr) -> syn::Result<LitStr> {
    let name = lit.value();
    if name.is_empty() {
        return Err(syn::Error::new(lit.span(), "target_fixture must not be empty"));
    }
    if RESERVED_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        return Err(syn::Error::new(
            lit.span(),
            format!("target_fixture `{name}` uses a reserved prefix"),
        ));
    }
    Ok(lit)
}
