//! Wrapper and registration record emitted for one step attribute.
//!
//! Everything lands inside an anonymous `const _: () = { .. };` block, so
//! stacked attributes on one function never clash over generated names.

use std::collections::HashSet;

use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use stepwise_patterns::StepKeyword;
use syn::LitStr;

use crate::attr::ConverterArg;
use crate::params::StepParam;
use crate::return_classifier::ReturnKind;
use crate::trigger::Trigger;

pub(crate) struct WrapperConfig<'a> {
    pub(crate) ident: &'a syn::Ident,
    pub(crate) keyword: StepKeyword,
    pub(crate) trigger: &'a Trigger,
    pub(crate) params: &'a [StepParam],
    pub(crate) converters: &'a [ConverterArg],
    pub(crate) target_fixture: Option<&'a LitStr>,
    pub(crate) return_kind: ReturnKind,
}

/// Reject combinations that would only fail once the step runs.
pub(crate) fn validate(config: &WrapperConfig<'_>) -> syn::Result<()> {
    if let Some(target) = config
        .target_fixture
        .filter(|_| !config.return_kind.has_value())
    {
        return Err(syn::Error::new(
            target.span(),
            "target_fixture requires the step to return a value",
        ));
    }

    let arguments: HashSet<&str> = argument_params(config.params)
        .map(|(_, name)| name.as_str())
        .collect();
    for converter in config.converters {
        if !arguments.contains(converter.key().as_str()) {
            return Err(syn::Error::new_spanned(
                &converter.name,
                format!(
                    "converter `{}` does not match any step argument",
                    converter.key()
                ),
            ));
        }
    }

    let Some(available) = config.trigger.arguments() else {
        return Ok(());
    };
    match argument_params(config.params).find(|(_, name)| !available.contains(name)) {
        Some((pat, name)) => Err(syn::Error::new_spanned(
            pat,
            format!("step argument `{name}` is not captured by the trigger"),
        )),
        None => Ok(()),
    }
}

fn argument_params(params: &[StepParam]) -> impl Iterator<Item = (&syn::Ident, &String)> {
    params.iter().filter_map(|param| match param {
        StepParam::Argument { pat, name, .. } => Some((pat, name)),
        _ => None,
    })
}

pub(crate) fn generate(config: &WrapperConfig<'_>, path: &TokenStream2) -> TokenStream2 {
    let ident = config.ident;
    let converted: HashSet<String> = config.converters.iter().map(ConverterArg::key).collect();

    let uses_ctx = config
        .params
        .iter()
        .any(|param| !matches!(param, StepParam::Argument { .. }));
    let uses_args = config
        .params
        .iter()
        .any(|param| matches!(param, StepParam::Argument { .. }));
    let ctx_pat = if uses_ctx {
        quote! { __stepwise_ctx }
    } else {
        quote! { _ }
    };
    let args_pat = if uses_args {
        quote! { mut __stepwise_args }
    } else {
        quote! { _ }
    };

    let locals: Vec<_> = (0..config.params.len())
        .map(|index| format_ident!("__stepwise_param_{index}"))
        .collect();
    let bindings = config
        .params
        .iter()
        .zip(&locals)
        .map(|(param, local)| match param {
            StepParam::Context => quote! { let #local = __stepwise_ctx; },
            StepParam::Fixture { name, ty, .. } => quote! {
                let #local: &#ty = __stepwise_ctx.fixture::<#ty>(#name)?;
            },
            StepParam::Argument { name, ty, .. } if converted.contains(name) => quote! {
                let #local: #ty = __stepwise_args.take_converted::<#ty>(#name)?;
            },
            StepParam::Argument { name, ty, .. } => quote! {
                let #local: #ty = __stepwise_args.take_parsed::<#ty>(#name)?;
            },
        });

    let call = quote! { #ident(#(#locals),*) };
    let body = call_body(&call, config.return_kind, config.target_fixture.is_some(), path);

    let converter_fns: Vec<_> = (0..config.converters.len())
        .map(|index| format_ident!("__stepwise_convert_{index}"))
        .collect();
    let converter_defs = config.converters.iter().zip(&converter_fns).map(|(converter, func)| {
        let expr = &converter.expr;
        quote! {
            fn #func(
                raw: &str,
            ) -> ::core::result::Result<::std::boxed::Box<dyn ::core::any::Any>, ::std::string::String> {
                #path::convert_with(raw, #expr)
            }
        }
    });
    let converter_names = config.converters.iter().map(ConverterArg::key);

    let keyword = format_ident!("{}", config.keyword.as_str());
    let spec = config.trigger.to_spec(path);
    let target = config.target_fixture.map_or_else(
        || quote! { ::core::option::Option::None },
        |lit| quote! { ::core::option::Option::Some(#lit) },
    );
    let fixtures = config
        .params
        .iter()
        .filter(|param| matches!(param, StepParam::Fixture { .. }))
        .filter_map(StepParam::lookup_name);

    quote! {
        const _: () = {
            fn __stepwise_wrapper(
                #ctx_pat: &#path::StepContext<'_>,
                #args_pat: #path::StepArgs
            ) -> ::core::result::Result<
                ::core::option::Option<::std::boxed::Box<dyn ::core::any::Any>>,
                #path::StepError,
            > {
                #(#bindings)*
                ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(move || #body))
                    .unwrap_or_else(|payload| {
                        ::core::result::Result::Err(#path::StepError::Panicked {
                            message: #path::panic_message(payload.as_ref()),
                        })
                    })
            }

            #(#converter_defs)*

            #path::submit! {
                #path::Step {
                    keyword: #path::StepKeyword::#keyword,
                    parser: #spec,
                    run: __stepwise_wrapper,
                    converters: &[#(#path::Converter { name: #converter_names, convert: #converter_fns }),*],
                    target_fixture: #target,
                    fixtures: &[#(#fixtures),*],
                    scope: ::core::module_path!(),
                    file: ::core::file!(),
                    line: ::core::line!(),
                    column: ::core::column!(),
                }
            }
        };
    }
}

/// Expression calling the user function and normalising its result.
fn call_body(
    call: &TokenStream2,
    kind: ReturnKind,
    publish: bool,
    path: &TokenStream2,
) -> TokenStream2 {
    let none = quote! { ::core::option::Option::None };
    let boxed = quote! {
        ::core::option::Option::Some(
            ::std::boxed::Box::new(__stepwise_value) as ::std::boxed::Box<dyn ::core::any::Any>
        )
    };
    match (kind, publish) {
        (ReturnKind::Unit, _) => quote! {{
            #call;
            ::core::result::Result::Ok(#none)
        }},
        (ReturnKind::Value, true) => quote! {{
            let __stepwise_value = #call;
            ::core::result::Result::Ok(#boxed)
        }},
        (ReturnKind::Value, false) => quote! {{
            let _ = #call;
            ::core::result::Result::Ok(#none)
        }},
        (ReturnKind::ResultUnit, _) => quote! {
            #call.map(|()| #none).map_err(#path::StepError::failed)
        },
        (ReturnKind::ResultValue, true) => quote! {
            #call.map(|__stepwise_value| #boxed).map_err(#path::StepError::failed)
        },
        (ReturnKind::ResultValue, false) => quote! {
            #call.map(|_| #none).map_err(#path::StepError::failed)
        },
    }
}
