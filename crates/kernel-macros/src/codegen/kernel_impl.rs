//! Kernel type generation.
//!
//! For a body `fn f(a: A, b: B, out: &mut O)` bound to operation `Op`, emits
//! a unit struct implementing `CpuKernelImpl` whose `run` destructures the
//! native input tuple and the output wrapper tuple and forwards them to `f`
//! positionally.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, ItemFn};

use crate::{parsing::CpuKernelArgs, validation::ParameterAnalysis};

pub(crate) fn generate_kernel_impl(
    args: &CpuKernelArgs,
    func: &ItemFn,
    analysis: &ParameterAnalysis<'_>,
    kernel_name: &Ident,
) -> TokenStream {
    let fn_name = &func.sig.ident;
    let vis = &func.vis;
    let op = &args.op;

    let in_vars: Vec<Ident> = (0..analysis.inputs.len())
        .map(|i| format_ident!("in_{}", i))
        .collect();
    let out_vars: Vec<Ident> = (0..analysis.outputs.len())
        .map(|i| format_ident!("out_{}", i))
        .collect();

    let unpack_ins = if in_vars.is_empty() {
        quote! { let _ = ins; }
    } else {
        quote! { let (#(#in_vars,)*) = ins; }
    };
    let unpack_outs = if out_vars.is_empty() {
        quote! { let _ = outs; }
    } else {
        quote! { let (#(#out_vars,)*) = outs; }
    };

    let doc = format!("CPU kernel for [`{fn_name}`].");

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        #vis struct #kernel_name;

        impl ::weft_backend_cpu::CpuKernelImpl for #kernel_name {
            type Op = #op;
            type Ins = <#op as ::weft_backend_cpu::GraphOp>::Ins;
            type Outs = <#op as ::weft_backend_cpu::GraphOp>::Outs;

            fn run<'a>(
                ins: <Self::Ins as ::weft_backend_cpu::CpuInputs>::Natives<'a>,
                outs: &mut <Self::Outs as ::weft_backend_cpu::CpuOutputs>::Wrappers<'a>,
            ) -> ::core::result::Result<(), ::weft_backend_cpu::KernelError> {
                #unpack_ins
                #unpack_outs
                ::weft_backend_cpu::IntoKernelResult::into_kernel_result(#fn_name(
                    #(#in_vars,)*
                    #(::weft_backend_cpu::OutputWrapper::native(#out_vars),)*
                ))
            }
        }
    }
}
