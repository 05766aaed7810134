//! Code generation for the step attributes.
//!
//! Generated code names the runtime by absolute path (`::stepwise::…`), so
//! this crate never depends on the runtime crate itself.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::quote;

pub(crate) mod wrapper;

/// Path to the `stepwise` crate, honouring a rename in the caller's
/// manifest.
pub(crate) fn stepwise_path() -> TokenStream2 {
    resolve_crate_path("stepwise", "stepwise")
}

fn resolve_crate_path(crate_name_str: &str, default_ident: &str) -> TokenStream2 {
    match crate_name(crate_name_str) {
        Ok(found) => {
            let ident = match found {
                FoundCrate::Itself => Ident::new(default_ident, Span::call_site()),
                FoundCrate::Name(name) => Ident::new(&name, Span::call_site()),
            };
            quote! { ::#ident }
        }
        Err(err) => handle_missing_crate(crate_name_str, &err),
    }
}

#[cfg(test)]
fn handle_missing_crate(crate_name_str: &str, _: &proc_macro_crate::Error) -> TokenStream2 {
    // Unit tests expand without the runtime crate in the dependency graph.
    let ident = Ident::new(&crate_name_str.replace('-', "_"), Span::call_site());
    quote! { ::#ident }
}

#[cfg(not(test))]
fn handle_missing_crate(crate_name_str: &str, err: &proc_macro_crate::Error) -> TokenStream2 {
    let message = format!("{crate_name_str} crate not found: {err}");
    quote! { ::core::compile_error!(#message) }
}
