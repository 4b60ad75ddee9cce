//! Code generation for CPU kernels.
//!
//! `kernel_impl` turns the annotated function into a `CpuKernelImpl` type;
//! `runtime` registers that type in the CPU backend's link-time kernel list.

pub(crate) mod kernel_impl;
pub(crate) mod runtime;
