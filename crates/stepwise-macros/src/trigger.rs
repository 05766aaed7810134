//! Step triggers as written in the attribute.
//!
//! A string literal, or a call to `parse`, `re` or `string` with a literal
//! argument, is validated during expansion and its argument names recorded.
//! Any other expression is forwarded untouched and must evaluate to a
//! `ParserSpec` in a `const` context.

use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Expr, ExprCall, Lit, LitStr};

/// Built-in parser a literal trigger maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TriggerKind {
    /// Exact text.
    String,
    /// Brace pattern.
    Parse,
    /// Regular expression with named groups.
    Re,
}

impl TriggerKind {
    fn from_fn_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "parse" => Some(Self::Parse),
            "re" => Some(Self::Re),
            _ => None,
        }
    }

    const fn fn_name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Parse => "parse",
            Self::Re => "re",
        }
    }
}

#[derive(Debug)]
pub(crate) enum Trigger {
    Known {
        kind: TriggerKind,
        lit: LitStr,
        arguments: Vec<String>,
    },
    Opaque(Expr),
}

impl Trigger {
    pub(crate) fn classify(expr: Expr) -> syn::Result<Self> {
        if let Expr::Lit(syn::ExprLit {
            lit: Lit::Str(lit), ..
        }) = &expr
        {
            return Ok(Self::Known {
                kind: TriggerKind::String,
                lit: lit.clone(),
                arguments: Vec::new(),
            });
        }
        let Expr::Call(call) = &expr else {
            return Ok(Self::Opaque(expr));
        };
        let Some((kind, lit)) = known_call(call) else {
            return Ok(Self::Opaque(expr));
        };
        let arguments = argument_names(kind, &lit)?;
        Ok(Self::Known {
            kind,
            lit,
            arguments,
        })
    }

    /// Argument names the parser will produce, when known at expansion time.
    pub(crate) fn arguments(&self) -> Option<&[String]> {
        match self {
            Self::Known { arguments, .. } => Some(arguments),
            Self::Opaque(_) => None,
        }
    }

    /// Expression building the `ParserSpec`.
    pub(crate) fn to_spec(&self, path: &TokenStream2) -> TokenStream2 {
        match self {
            Self::Known { kind, lit, .. } => {
                let func = format_ident!("{}", kind.fn_name());
                quote! { #path::parsers::#func(#lit) }
            }
            Self::Opaque(expr) => quote! { #expr },
        }
    }
}

fn known_call(call: &ExprCall) -> Option<(TriggerKind, LitStr)> {
    let Expr::Path(func) = call.func.as_ref() else {
        return None;
    };
    let segments: Vec<_> = func.path.segments.iter().collect();
    let (last, qualifier) = match segments.as_slice() {
        [last] if func.path.leading_colon.is_none() => (last, None),
        [.., qualifier, last] => (last, Some(qualifier)),
        _ => return None,
    };
    if qualifier.is_some_and(|segment| segment.ident != "parsers") {
        return None;
    }
    let kind = TriggerKind::from_fn_name(&last.ident.to_string())?;
    let mut args = call.args.iter();
    let (Some(Expr::Lit(syn::ExprLit { lit: Lit::Str(lit), .. })), None) = (args.next(), args.next())
    else {
        return None;
    };
    Some((kind, lit.clone()))
}

fn argument_names(kind: TriggerKind, lit: &LitStr) -> syn::Result<Vec<String>> {
    let source = lit.value();
    match kind {
        TriggerKind::String => Ok(Vec::new()),
        TriggerKind::Parse => stepwise_patterns::placeholder_names(&source)
            .map_err(|err| syn::Error::new(lit.span(), format!("invalid step pattern: {err}"))),
        TriggerKind::Re => regex::Regex::new(&source)
            .map(|regex| regex.capture_names().flatten().map(str::to_owned).collect())
            .map_err(|err| syn::Error::new(lit.span(), format!("invalid step regex: {err}"))),
    }
}
