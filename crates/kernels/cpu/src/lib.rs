//! Weft CPU Backend
//!
//! Runs graph operations on the CPU. Kernel bodies are plain Rust functions
//! written against `nalgebra` types; this crate converts graph values into
//! those types, calls the body, and finishes the outputs afterwards.
//!
//! # Writing a kernel
//!
//! ```ignore
//! use weft_backend_cpu::nalgebra::Vector4;
//! use weft_backend_cpu::{cpu_kernel, graph_op, GMat, GScalar, NativeView, NativeViewMut};
//!
//! graph_op! {
//!     pub struct AddC = "core.add_c": (GMat<f32>, GScalar) -> (GMat<f32>);
//! }
//!
//! #[cpu_kernel(op = AddC)]
//! fn add_c(src: NativeView<'_, f32>, c: Vector4<f64>, dst: &mut NativeViewMut<'_, f32>) {
//!     dst.zip_apply(&src, |d, s| *d = s + c[0] as f32);
//! }
//! ```
//!
//! Parameters that are not `&mut` are inputs, in signature order. The
//! trailing `&mut` parameters are outputs. The macro generates `AddCKernel`
//! and registers it, so it shows up in [`kernels()`].
//!
//! Outputs must be `&mut`. A read-only output parameter is read as one more
//! input and the kernel does not compile:
//!
//! ```compile_fail
//! use weft_backend_cpu::{cpu_kernel, graph_op, GArray, GMat, NativeView};
//!
//! graph_op! {
//!     pub struct Collect = "doc.collect": (GMat<u8>) -> (GArray<u8>);
//! }
//!
//! #[cpu_kernel(op = Collect)]
//! fn collect(src: NativeView<'_, u8>, dst: &Vec<u8>) {}
//! ```
//!
//! # Running a kernel
//!
//! ```ignore
//! let package = weft_backend_cpu::kernels()?;
//! let mut ctx = CpuContext::new(vec![Arg::from(&src), Arg::from(&c)])
//!     .with_output(0, &mut dst);
//! package.get("core.add_c")?.apply(&mut ctx)?;
//! ```

extern crate self as weft_backend_cpu;

pub mod adapter;
pub mod call;
pub mod config;
pub mod context;
pub mod error;
pub mod kernel;

use linkme::distributed_slice;

pub use adapter::{
    native_view, native_view_mut, scalar_from_native, scalar_to_native, CpuInput, CpuOutput,
    NativeView, NativeViewMut, OutputWrapper, ScalarWriteBack, TrackedBuffer,
};
pub use call::{call, CpuInputs, CpuOutputs};
pub use config::{BufferValidation, CpuBackendConfig};
pub use context::CpuContext;
pub use error::{KernelError, Port};
pub use kernel::{CpuKernel, CpuKernelDescriptor, CpuKernelFn, CpuKernelImpl, IntoKernelResult};

pub use weft_foundation::{Arg, ArgKind, ArrayRef, Buffer, DType, ElemType, OpaqueRef, OutArg, Scalar};
pub use weft_kernel_macros::cpu_kernel;
pub use weft_kernel_registry::{KernelPackage, RegisteredKernel, RegistryError};
pub use weft_kernel_types::{
    graph_op, Backend, GArray, GMat, GOpaque, GScalar, GraphOp, Signature, ValueKind,
};

// Re-exported for macro-generated code and kernel authors
pub use linkme;
pub use nalgebra;

/// Kernels registered by [`cpu_kernel`], collected at link time.
#[distributed_slice]
pub static CPU_KERNELS: [CpuKernelDescriptor];

/// Identity of the CPU backend.
pub const fn backend() -> Backend {
    Backend::new("cpu")
}

/// Build the CPU kernel package from every registered kernel.
pub fn kernels() -> Result<KernelPackage<CpuKernel>, RegistryError> {
    KernelPackage::from_kernels(backend(), CPU_KERNELS.iter().map(|d| (d.kernel)()))
}

/// Look up the registration record for an operation.
pub fn descriptor(op: &str) -> Option<&'static CpuKernelDescriptor> {
    CPU_KERNELS.iter().find(|d| d.op == op)
}
