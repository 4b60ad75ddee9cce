//! Proc-macro for registering CPU kernels.
//!
//! # Usage
//!
//! ```ignore
//! use weft_backend_cpu::nalgebra::Vector4;
//! use weft_backend_cpu::{cpu_kernel, NativeView};
//!
//! /// Sum of every element, in channel 0.
//! #[cpu_kernel(op = Sum)]
//! pub fn sum(src: NativeView<'_, f64>, dst: &mut Vector4<f64>) {
//!     *dst = Vector4::new(src.sum(), 0.0, 0.0, 0.0);
//! }
//! ```
//!
//! Generated items live next to the function:
//!
//! - `SumKernel` (or the `name = "..."` override), implementing
//!   `weft_backend_cpu::CpuKernelImpl` for the operation given by `op`
//! - a `CPU_KERNELS` registration entry, so the kernel is part of
//!   `weft_backend_cpu::kernels()` in any binary that links it
//!
//! Leading by-value and `&` parameters are the operation's inputs, in order.
//! Trailing `&mut` parameters are its outputs. The body may return `()` or
//! `Result<(), E>` with `E: Into<KernelError>`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, ItemFn};

mod codegen;
mod parsing;
mod shared;
mod validation;

use parsing::AttributeArgs;

/// Bind a function to a graph operation as its CPU kernel.
///
/// # Attributes
///
/// - `op = Path` (required): the operation type, declared with `graph_op!`
/// - `name = "Ident"`: name of the generated kernel type
///   (default: the function name in UpperCamelCase followed by `Kernel`)
#[proc_macro_attribute]
pub fn cpu_kernel(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as AttributeArgs);
    let func = parse_macro_input!(item as ItemFn);

    let args = match args.for_function(&func) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let analysis = match validation::analyze_parameters(&func) {
        Ok(analysis) => analysis,
        Err(err) => return err.to_compile_error().into(),
    };

    let kernel_name = shared::kernel_type_name(&func.sig.ident, args.name.as_ref());
    let kernel_impl =
        codegen::kernel_impl::generate_kernel_impl(&args, &func, &analysis, &kernel_name);
    let registration = codegen::runtime::generate_registration(&args, &func, &kernel_name);

    let expanded = quote! {
        #func

        #kernel_impl

        #registration
    };

    expanded.into()
}
