//! Return type classification for step wrappers.
//!
//! The wrapper has to know whether a step returns nothing, a value, or a
//! `Result`, and stable Rust offers no trait-based way to tell `()` from `T`
//! from `Result<T, E>`. Classification therefore happens syntactically during
//! expansion. `Result`, `std::result::Result` and `core::result::Result` are
//! recognised; type aliases are not resolved and count as plain values.

use syn::{Path, ReturnType, Type};

/// How a step return value is normalised by the generated wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReturnKind {
    /// `()` or no explicit return type.
    Unit,
    /// A value `T`.
    Value,
    /// `Result<(), E>`.
    ResultUnit,
    /// `Result<T, E>`.
    ResultValue,
}

impl ReturnKind {
    /// Whether a successful call yields something to publish.
    pub(crate) const fn has_value(self) -> bool {
        matches!(self, Self::Value | Self::ResultValue)
    }
}

pub(crate) fn classify_return_type(output: &ReturnType) -> ReturnKind {
    let ty = match output {
        ReturnType::Default => return ReturnKind::Unit,
        ReturnType::Type(_, ty) => ty.as_ref(),
    };
    if is_unit_type(ty) {
        return ReturnKind::Unit;
    }
    classify_result_like(ty).unwrap_or(ReturnKind::Value)
}

fn classify_result_like(ty: &Type) -> Option<ReturnKind> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if !is_result_path(&type_path.path) {
        return None;
    }
    let ok_ty = first_type_argument(&type_path.path)?;
    Some(if is_unit_type(ok_ty) {
        ReturnKind::ResultUnit
    } else {
        ReturnKind::ResultValue
    })
}

fn is_unit_type(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn is_result_path(path: &Path) -> bool {
    let segments: Vec<_> = path
        .segments
        .iter()
        .map(|seg| seg.ident.to_string())
        .collect();
    match segments.as_slice() {
        [single] => single == "Result",
        [root, module, leaf] => {
            (root == "std" || root == "core") && module == "result" && leaf == "Result"
        }
        _ => false,
    }
}

fn first_type_argument(path: &Path) -> Option<&Type> {
    let segment = path.segments.last()?;
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::{ReturnKind, classify_return_type};
    use rstest::rstest;

    #[rstest]
    #[case(syn::parse_quote!(fn step() {}), ReturnKind::Unit)]
    #[case(syn::parse_quote!(fn step() -> () {}), ReturnKind::Unit)]
    #[case(syn::parse_quote!(fn step() -> u32 { 1 }), ReturnKind::Value)]
    #[case(syn::parse_quote!(fn step() -> Result<(), &'static str> { Ok(()) }), ReturnKind::ResultUnit)]
    #[case(syn::parse_quote!(fn step() -> Result<u8, String> { Ok(1) }), ReturnKind::ResultValue)]
    #[case(
        syn::parse_quote!(fn step() -> std::result::Result<u8, String> { Ok(1) }),
        ReturnKind::ResultValue
    )]
    #[case(
        syn::parse_quote!(fn step() -> core::result::Result<(), String> { Ok(()) }),
        ReturnKind::ResultUnit
    )]
    fn classifies_return_shapes(#[case] func: syn::ItemFn, #[case] expected: ReturnKind) {
        assert_eq!(classify_return_type(&func.sig.output), expected);
    }

    #[test]
    fn aliases_are_treated_as_values() {
        let func: syn::ItemFn = syn::parse_quote!(
            fn step() -> io::Result<()> {
                Ok(())
            }
        );
        assert_eq!(classify_return_type(&func.sig.output), ReturnKind::Value);
    }
}
