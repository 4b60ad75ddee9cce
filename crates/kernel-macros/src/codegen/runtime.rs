//! Link-time registration of generated kernels.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, ItemFn};

use crate::{parsing::CpuKernelArgs, shared::descriptor_name};

/// Generate the distributed slice entry for a kernel type
pub(crate) fn generate_registration(
    args: &CpuKernelArgs,
    func: &ItemFn,
    kernel_name: &Ident,
) -> TokenStream {
    let op = &args.op;
    let descriptor = descriptor_name(&func.sig.ident);
    let name = kernel_name.to_string();

    quote! {
        #[allow(non_upper_case_globals)]
        #[::weft_backend_cpu::linkme::distributed_slice(::weft_backend_cpu::CPU_KERNELS)]
        #[linkme(crate = ::weft_backend_cpu::linkme)]
        static #descriptor: ::weft_backend_cpu::CpuKernelDescriptor =
            ::weft_backend_cpu::CpuKernelDescriptor {
                op: <#op as ::weft_backend_cpu::GraphOp>::ID,
                name: #name,
                kernel: <#kernel_name as ::weft_backend_cpu::CpuKernelImpl>::kernel,
                signature: <#op as ::weft_backend_cpu::GraphOp>::signature,
            };
    }
}
