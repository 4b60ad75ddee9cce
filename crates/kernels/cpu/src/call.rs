//! Invocation of a typed kernel body against a [`CpuContext`].
//!
//! A call runs in fixed phases:
//!
//! 1. check the argument list against the operation signature
//! 2. read inputs `0..N` in order
//! 3. acquire outputs `0..M` in order
//! 4. run the body
//! 5. postprocess outputs `0..M` in order, also when the body failed
//!
//! The body's own error takes precedence over a postprocessing error. A body
//! that panics still gets its outputs postprocessed while the panic unwinds;
//! the panic then continues to the caller.

use tracing::{debug, debug_span, trace};
use weft_kernel_types::{ArgList, GraphOp};

use crate::adapter::{CpuInput, CpuOutput, OutputWrapper};
use crate::config::CpuBackendConfig;
use crate::context::CpuContext;
use crate::error::KernelError;
use crate::kernel::CpuKernelImpl;

/// Ordered input list, implemented for tuples of [`CpuInput`] markers.
pub trait CpuInputs: ArgList {
    /// Tuple of native input values.
    type Natives<'a>;

    fn unpack<'a>(ctx: &CpuContext<'a>) -> Result<Self::Natives<'a>, KernelError>;
}

/// Ordered output list, implemented for tuples of [`CpuOutput`] markers.
pub trait CpuOutputs: ArgList {
    /// Tuple of output wrappers.
    type Wrappers<'a>;

    fn acquire<'a>(ctx: &mut CpuContext<'a>) -> Result<Self::Wrappers<'a>, KernelError>;

    /// Postprocess every wrapper and report the first failure.
    fn postprocess(
        wrappers: Self::Wrappers<'_>,
        config: &CpuBackendConfig,
    ) -> Result<(), KernelError>;
}

impl CpuInputs for () {
    type Natives<'a> = ();

    fn unpack<'a>(_ctx: &CpuContext<'a>) -> Result<(), KernelError> {
        Ok(())
    }
}

impl CpuOutputs for () {
    type Wrappers<'a> = ();

    fn acquire<'a>(_ctx: &mut CpuContext<'a>) -> Result<(), KernelError> {
        Ok(())
    }

    fn postprocess(_wrappers: (), _config: &CpuBackendConfig) -> Result<(), KernelError> {
        Ok(())
    }
}

macro_rules! impl_cpu_lists {
    ($($T:ident $w:ident $idx:tt),+) => {
        impl<$($T: CpuInput),+> CpuInputs for ($($T,)+) {
            type Natives<'a> = ($($T::In<'a>,)+);

            fn unpack<'a>(ctx: &CpuContext<'a>) -> Result<Self::Natives<'a>, KernelError> {
                Ok(($($T::get_in(ctx, $idx)?,)+))
            }
        }

        impl<$($T: CpuOutput),+> CpuOutputs for ($($T,)+) {
            type Wrappers<'a> = ($($T::Out<'a>,)+);

            fn acquire<'a>(ctx: &mut CpuContext<'a>) -> Result<Self::Wrappers<'a>, KernelError> {
                Ok(($($T::get_out(ctx, $idx)?,)+))
            }

            fn postprocess(
                wrappers: Self::Wrappers<'_>,
                config: &CpuBackendConfig,
            ) -> Result<(), KernelError> {
                let ($($w,)+) = wrappers;
                let mut first = None;
                $(
                    if let Err(err) = $w.postprocess(config) {
                        first.get_or_insert(err);
                    }
                )+
                first.map_or(Ok(()), Err)
            }
        }
    };
}

impl_cpu_lists!(A a 0);
impl_cpu_lists!(A a 0, B b 1);
impl_cpu_lists!(A a 0, B b 1, C c 2);
impl_cpu_lists!(A a 0, B b 1, C c 2, D d 3);
impl_cpu_lists!(A a 0, B b 1, C c 2, D d 3, E e 4);
impl_cpu_lists!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5);
impl_cpu_lists!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6);
impl_cpu_lists!(A a 0, B b 1, C c 2, D d 3, E e 4, F f 5, G g 6, H h 7);

/// Acquired output wrappers awaiting postprocessing.
///
/// Dropping it with wrappers still held (a panicking body) postprocesses them
/// on the way out.
struct Pending<'a, O: CpuOutputs> {
    wrappers: Option<O::Wrappers<'a>>,
    config: CpuBackendConfig,
}

impl<O: CpuOutputs> Pending<'_, O> {
    fn finish(mut self) -> Result<(), KernelError> {
        match self.wrappers.take() {
            Some(wrappers) => O::postprocess(wrappers, &self.config),
            None => Ok(()),
        }
    }
}

impl<O: CpuOutputs> Drop for Pending<'_, O> {
    fn drop(&mut self) {
        if let Some(wrappers) = self.wrappers.take() {
            let finished = O::postprocess(wrappers, &self.config);
            debug!(ok = finished.is_ok(), "outputs postprocessed while unwinding");
        }
    }
}

/// Run kernel `K` against the arguments held by `ctx`.
pub fn call<K: CpuKernelImpl>(ctx: &mut CpuContext<'_>) -> Result<(), KernelError> {
    let op = <K::Op as GraphOp>::ID;
    let span = debug_span!("kernel", op, backend = %K::backend());
    let _enter = span.enter();

    if let Err(err) = ctx.check_signature(&K::Op::signature()) {
        debug!(%err, "argument list rejected");
        return Err(err);
    }
    let config = *ctx.config();

    let ins = K::Ins::unpack(ctx)?;
    let mut pending = Pending::<K::Outs> {
        wrappers: Some(K::Outs::acquire(ctx)?),
        config,
    };
    trace!(
        inputs = <K::Ins as ArgList>::LEN,
        outputs = <K::Outs as ArgList>::LEN,
        "arguments bound"
    );

    let result = pending
        .wrappers
        .as_mut()
        .map_or(Ok(()), |outs| K::run(ins, outs));
    let finished = pending.finish();
    trace!(ok = finished.is_ok(), "outputs postprocessed");

    match (result, finished) {
        (Ok(()), finished) => finished,
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(post)) => {
            debug!(%post, "postprocessing also failed after body error");
            Err(err)
        }
    }
}
