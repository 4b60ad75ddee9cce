//! Parameter analysis for kernel bodies.

use syn::{FnArg, GenericParam, ItemFn, Type};

/// Kernel body parameters split into inputs and outputs
pub(crate) struct ParameterAnalysis<'a> {
    /// Leading parameters, passed by value
    pub(crate) inputs: Vec<&'a Type>,
    /// Trailing `&mut` parameters
    pub(crate) outputs: Vec<&'a Type>,
}

fn is_output(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => reference.mutability.is_some(),
        Type::Group(group) => is_output(&group.elem),
        Type::Paren(paren) => is_output(&paren.elem),
        _ => false,
    }
}

/// Check the function shape and classify its parameters.
///
/// Parameters before the first `&mut` parameter are inputs; that one and
/// everything after it are outputs.
pub(crate) fn analyze_parameters(func: &ItemFn) -> syn::Result<ParameterAnalysis<'_>> {
    let sig = &func.sig;

    if let Some(token) = &sig.asyncness {
        return Err(syn::Error::new_spanned(token, "kernel bodies cannot be async"));
    }
    if let Some(param) = sig
        .generics
        .params
        .iter()
        .find(|p| !matches!(p, GenericParam::Lifetime(_)))
    {
        return Err(syn::Error::new_spanned(
            param,
            "kernel bodies cannot be generic over types or constants",
        ));
    }
    if let Some(variadic) = &sig.variadic {
        return Err(syn::Error::new_spanned(variadic, "kernel bodies cannot be variadic"));
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for arg in &sig.inputs {
        let pat = match arg {
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "kernel bodies are free functions and cannot take `self`",
                ));
            }
            FnArg::Typed(pat) => pat,
        };

        let ty = pat.ty.as_ref();
        if is_output(ty) {
            outputs.push(ty);
        } else if outputs.is_empty() {
            inputs.push(ty);
        } else {
            return Err(syn::Error::new_spanned(
                pat,
                "input parameter follows an output; outputs (`&mut` parameters) must come last",
            ));
        }
    }

    Ok(ParameterAnalysis { inputs, outputs })
}
