//! Shared expansion for the step attributes.

use proc_macro::TokenStream;
use quote::quote;
use stepwise_patterns::StepKeyword;

use crate::attr::StepAttrArgs;
use crate::codegen::stepwise_path;
use crate::codegen::wrapper::{WrapperConfig, generate, validate};
use crate::params::classify_params;
use crate::return_classifier::classify_return_type;

pub(crate) fn step_attr(attr: TokenStream, item: TokenStream, keyword: StepKeyword) -> TokenStream {
    let mut func = syn::parse_macro_input!(item as syn::ItemFn);
    let args = match syn::parse::<StepAttrArgs>(attr) {
        Ok(args) => args,
        Err(err) => return with_error(&func, &err),
    };
    let params = match classify_params(&mut func) {
        Ok(params) => params,
        Err(err) => return with_error(&func, &err),
    };

    let config = WrapperConfig {
        ident: &func.sig.ident,
        keyword,
        trigger: &args.trigger,
        params: &params,
        converters: &args.converters,
        target_fixture: args.target_fixture.as_ref(),
        return_kind: classify_return_type(&func.sig.output),
    };
    if let Err(err) = validate(&config) {
        return with_error(&func, &err);
    }
    let registration = generate(&config, &stepwise_path());

    TokenStream::from(quote! {
        #func
        #registration
    })
}

/// Keep the function so one bad attribute does not cascade into unresolved
/// names at every call site.
fn with_error(func: &syn::ItemFn, err: &syn::Error) -> TokenStream {
    let err = err.to_compile_error();
    TokenStream::from(quote! {
        #func
        #err
    })
}
