//! Weft Kernel Functions
//!
//! Core graph operations and their CPU kernels. Operations are declared in
//! [`ops`]; kernels are registered via the `#[cpu_kernel]` attribute macro
//! and collected by [`kernels`].

pub mod arithm;
pub mod imgproc;
pub mod ops;
pub mod points;

use weft_backend_cpu::{CpuKernel, KernelPackage, RegistryError};

/// CPU kernel package with every kernel linked into the binary,
/// including the ones defined here.
pub fn kernels() -> Result<KernelPackage<CpuKernel>, RegistryError> {
    weft_backend_cpu::kernels()
}
