//! CPU kernel objects.

use std::fmt;

use weft_kernel_registry::RegisteredKernel;
use weft_kernel_types::{Backend, GraphOp, Signature};

use crate::call::{call, CpuInputs, CpuOutputs};
use crate::context::CpuContext;
use crate::error::KernelError;

/// Type-erased entry point of a CPU kernel.
pub type CpuKernelFn = for<'a, 'b> fn(&'b mut CpuContext<'a>) -> Result<(), KernelError>;

/// A typed CPU kernel: binds a kernel body to the operation it implements.
///
/// Usually generated by [`cpu_kernel`](crate::cpu_kernel) from a plain function.
pub trait CpuKernelImpl: Sized + 'static {
    type Op: GraphOp<Ins = Self::Ins, Outs = Self::Outs>;
    type Ins: CpuInputs;
    type Outs: CpuOutputs;

    /// The kernel body, fed with native inputs and output wrappers.
    fn run<'a>(
        ins: <Self::Ins as CpuInputs>::Natives<'a>,
        outs: &mut <Self::Outs as CpuOutputs>::Wrappers<'a>,
    ) -> Result<(), KernelError>;

    fn backend() -> Backend {
        crate::backend()
    }

    /// Erase the kernel into a [`CpuKernel`].
    fn kernel() -> CpuKernel {
        CpuKernel::new(<Self::Op as GraphOp>::ID, call::<Self>)
    }
}

/// Kernel object stored in the CPU kernel package.
#[derive(Clone, Copy)]
pub struct CpuKernel {
    op: &'static str,
    entry: CpuKernelFn,
}

impl CpuKernel {
    pub const fn new(op: &'static str, entry: CpuKernelFn) -> Self {
        Self { op, entry }
    }

    /// Run the kernel against a prepared argument list.
    pub fn apply(&self, ctx: &mut CpuContext<'_>) -> Result<(), KernelError> {
        (self.entry)(ctx)
    }
}

impl RegisteredKernel for CpuKernel {
    fn backend(&self) -> Backend {
        crate::backend()
    }

    fn op_id(&self) -> &'static str {
        self.op
    }
}

impl fmt::Debug for CpuKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuKernel").field("op", &self.op).finish_non_exhaustive()
    }
}

/// Link-time registration record for one CPU kernel.
pub struct CpuKernelDescriptor {
    /// Operation id
    pub op: &'static str,
    /// Name of the kernel type
    pub name: &'static str,
    pub kernel: fn() -> CpuKernel,
    pub signature: fn() -> Signature,
}

impl fmt::Debug for CpuKernelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuKernelDescriptor")
            .field("op", &self.op)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Adapts kernel body return values to `Result<(), KernelError>`.
///
/// Bodies may return nothing or a `Result` whose error converts into
/// [`KernelError`].
pub trait IntoKernelResult {
    fn into_kernel_result(self) -> Result<(), KernelError>;
}

impl IntoKernelResult for () {
    fn into_kernel_result(self) -> Result<(), KernelError> {
        Ok(())
    }
}

impl<E: Into<KernelError>> IntoKernelResult for Result<(), E> {
    fn into_kernel_result(self) -> Result<(), KernelError> {
        self.map_err(Into::into)
    }
}
