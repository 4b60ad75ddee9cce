//! Naming helpers shared across codegen modules.

use quote::format_ident;
use syn::Ident;

/// Convert a snake_case identifier to UpperCamelCase.
pub(crate) fn upper_camel(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Name of the kernel type generated for `fn_name`.
pub(crate) fn kernel_type_name(fn_name: &Ident, name: Option<&Ident>) -> Ident {
    match name {
        Some(name) => name.clone(),
        None => format_ident!("{}Kernel", upper_camel(&fn_name.to_string())),
    }
}

/// Name of the registration static generated for `fn_name`.
pub(crate) fn descriptor_name(fn_name: &Ident) -> Ident {
    format_ident!("__CPU_KERNEL_{}", fn_name.to_string().to_uppercase())
}
