//! Classification of step function parameters.
//!
//! Each parameter becomes exactly one of:
//!
//! - the step context, for a shared reference to a type named `StepContext`;
//! - a fixture, for any other shared reference, looked up by the parameter
//!   name or by `#[from(name)]`;
//! - a step argument, for an owned type, taken by name from the arguments the
//!   parser extracted.

use syn::ext::IdentExt;
use syn::{FnArg, Ident, Pat, PatType, Type};

/// One parameter of a step function.
#[derive(Debug)]
pub(crate) enum StepParam {
    Context,
    Fixture { name: String, ty: Type },
    Argument { pat: Ident, name: String, ty: Type },
}

impl StepParam {
    /// Name the runtime looks the value up by.
    pub(crate) fn lookup_name(&self) -> Option<&str> {
        match self {
            Self::Context => None,
            Self::Fixture { name, .. } | Self::Argument { name, .. } => Some(name),
        }
    }
}

/// Classify every parameter of `func`, stripping the `#[from]` attributes
/// the compiler would otherwise reject.
pub(crate) fn classify_params(func: &mut syn::ItemFn) -> syn::Result<Vec<StepParam>> {
    if let Some(asyncness) = &func.sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "step functions must be synchronous",
        ));
    }
    let generics = &func.sig.generics;
    if generics.type_params().next().is_some() || generics.const_params().next().is_some() {
        return Err(syn::Error::new_spanned(
            generics,
            "step functions cannot be generic over types",
        ));
    }
    func.sig.inputs.iter_mut().map(classify_param).collect()
}

fn classify_param(arg: &mut FnArg) -> syn::Result<StepParam> {
    let arg = match arg {
        FnArg::Receiver(receiver) => {
            return Err(syn::Error::new_spanned(
                receiver,
                "step functions cannot take `self`",
            ));
        }
        FnArg::Typed(arg) => arg,
    };
    let renamed = take_from_attr(arg)?;
    let Pat::Ident(pat) = arg.pat.as_ref() else {
        return Err(syn::Error::new_spanned(
            &arg.pat,
            "step parameters must be plain identifiers",
        ));
    };
    if pat.by_ref.is_some() || pat.subpat.is_some() {
        return Err(syn::Error::new_spanned(
            pat,
            "step parameters must be plain identifiers",
        ));
    }
    let name = renamed.unwrap_or_else(|| pat.ident.unraw().to_string());
    let pat = pat.ident.clone();

    match arg.ty.as_ref() {
        Type::Reference(reference) if reference.mutability.is_some() => Err(syn::Error::new_spanned(
            reference,
            "fixtures are shared between steps; take `&T` instead of `&mut T`",
        )),
        Type::Reference(reference) if is_step_context(&reference.elem) => Ok(StepParam::Context),
        Type::Reference(reference) => Ok(StepParam::Fixture {
            name,
            ty: (*reference.elem).clone(),
        }),
        Type::ImplTrait(ty) => Err(syn::Error::new_spanned(
            ty,
            "step arguments need a concrete type",
        )),
        ty => Ok(StepParam::Argument {
            pat,
            name,
            ty: ty.clone(),
        }),
    }
}

fn is_step_context(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "StepContext")
}

/// Remove `#[from(name)]` from `arg` and return the name.
fn take_from_attr(arg: &mut PatType) -> syn::Result<Option<String>> {
    let mut found = None;
    let mut error: Option<syn::Error> = None;
    arg.attrs.retain(|attr| {
        if !attr.path().is_ident("from") {
            return true;
        }
        let parsed = attr.parse_args::<syn::Ident>().and_then(|ident| {
            if found.is_some() {
                Err(syn::Error::new_spanned(attr, "duplicate #[from] attribute"))
            } else {
                Ok(ident.unraw().to_string())
            }
        });
        match parsed {
            Ok(name) => found = Some(name),
            Err(err) => {
                error.get_or_insert(err);
            }
        }
        false
    });
    error.map_or(Ok(found), Err)
}
